//! Windowed byte cursors over arena-owned buffers
//!
//! A [`BufferArena`] owns one growable byte store per source file. A
//! [`Cursor`] is a small `Copy` value naming a store and a window
//! `[start, end)` inside it, plus its own read/write position. Any number of
//! cursors may alias the same store; writes made through one cursor are
//! visible through every other cursor on that store, while window bounds
//! stay independent per cursor.
//!
//! ## Windows
//!
//! - The root cursor returned by [`BufferArena::insert`] spans the whole
//!   store and is the only cursor allowed to grow it.
//! - [`Cursor::sub_window`] carves the next `size` bytes off the parent and
//!   advances the parent past them, so parent and child never overlap.
//! - [`Cursor::sub_window_at`] opens an independent window at an absolute
//!   offset, leaving the parent untouched.
//!
//! ## Example
//!
//! ```rust
//! use aimdb::buffer::BufferArena;
//!
//! let mut arena = BufferArena::new();
//! let mut root = arena.insert(vec![1, 0, 0, 0, 0xAA, 0xBB]);
//!
//! let mut header = root.sub_window(4)?;
//! assert_eq!(header.read_u32(&arena)?, 1);
//! assert!(header.at_end());
//!
//! let tail = root.read_slice(&arena, 2)?;
//! assert_eq!(tail, &[0xAA, 0xBB]);
//! assert!(root.at_end());
//! # Ok::<(), aimdb::Error>(())
//! ```

use byteorder::{ByteOrder, LittleEndian};

use crate::db::DbString;
use crate::error::{Error, Result};

/// Handle to a byte store owned by a [`BufferArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(usize);

/// Owner of every backing byte store that cursors point into
#[derive(Debug, Default)]
pub struct BufferArena {
    stores: Vec<Vec<u8>>,
}

impl BufferArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `bytes` and return the root cursor over them
    pub fn insert(&mut self, bytes: Vec<u8>) -> Cursor {
        let id = StoreId(self.stores.len());
        let end = bytes.len();
        self.stores.push(bytes);
        Cursor {
            store: Some(id),
            start: 0,
            index: 0,
            end,
            data_offset: 0,
            root: true,
        }
    }

    /// Allocate a zero-filled store of `size` bytes and return its root cursor
    pub fn allocate(&mut self, size: usize) -> Cursor {
        self.insert(vec![0; size])
    }

    /// Whole backing store behind `cursor`, ignoring the cursor's window
    pub fn bytes(&self, cursor: &Cursor) -> Result<&[u8]> {
        self.store(cursor.store).map(Vec::as_slice)
    }

    /// Number of stores held by the arena
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    fn store(&self, id: Option<StoreId>) -> Result<&Vec<u8>> {
        id.and_then(|StoreId(i)| self.stores.get(i))
            .ok_or(Error::Uninitialized)
    }

    fn store_mut(&mut self, id: Option<StoreId>) -> Result<&mut Vec<u8>> {
        id.and_then(|StoreId(i)| self.stores.get_mut(i))
            .ok_or(Error::Uninitialized)
    }
}

/// Bounded read/write window over a store in a [`BufferArena`]
///
/// `Cursor::default()` is attached to no store; every operation on it fails
/// with [`Error::Uninitialized`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    store: Option<StoreId>,
    /// Absolute index of the first byte of the window
    start: usize,
    /// Absolute index of the next byte to read or write
    index: usize,
    /// Absolute index one past the last byte of the window
    end: usize,
    /// Externally visible offset counter, advanced together with `index`
    data_offset: usize,
    /// Root cursors own their store and may grow it
    root: bool,
}

impl Cursor {
    /// Copy up to `dst.len()` bytes into `dst` and advance past them
    ///
    /// In strict mode (`tolerant == false`) reading from an exhausted window,
    /// or asking for more bytes than remain, is [`Error::OutOfRange`]. In
    /// tolerant mode the first case returns `Ok(0)` and the second truncates
    /// to the remaining bytes.
    pub fn read(&mut self, arena: &BufferArena, dst: &mut [u8], tolerant: bool) -> Result<usize> {
        let store = arena.store(self.store)?;
        if dst.is_empty() {
            return Ok(0);
        }
        if self.index >= self.end {
            return if tolerant {
                Ok(0)
            } else {
                Err(self.out_of_range(dst.len()))
            };
        }

        let mut n = dst.len();
        if n > self.remaining() {
            if !tolerant {
                return Err(self.out_of_range(n));
            }
            n = self.remaining();
        }

        let src = store
            .get(self.index..self.index + n)
            .ok_or_else(|| self.out_of_range(n))?;
        dst[..n].copy_from_slice(src);
        self.advance(n);
        Ok(n)
    }

    /// Borrow the next `n` bytes straight out of the store (strict)
    pub fn read_slice<'a>(&mut self, arena: &'a BufferArena, n: usize) -> Result<&'a [u8]> {
        let store = arena.store(self.store)?;
        if n > self.remaining() {
            return Err(self.out_of_range(n));
        }
        let bytes = store
            .get(self.index..self.index + n)
            .ok_or_else(|| self.out_of_range(n))?;
        self.advance(n);
        Ok(bytes)
    }

    /// Copy `src` to the current position and advance past it
    ///
    /// A root cursor grows its store when the write runs past the end. A
    /// sub-window never grows the store: overrunning its bound is
    /// [`Error::OutOfRange`] in strict mode and `Ok(0)` in tolerant mode.
    pub fn write(&mut self, arena: &mut BufferArena, src: &[u8], tolerant: bool) -> Result<usize> {
        let store = arena.store_mut(self.store)?;
        let n = src.len();
        let needed = self.index + n;

        if needed > self.end {
            if !self.root {
                return if tolerant {
                    Ok(0)
                } else {
                    Err(self.out_of_range(n))
                };
            }
            if needed > store.len() {
                store.resize(needed, 0);
            }
            self.end = needed;
        }

        store
            .get_mut(self.index..needed)
            .ok_or(Error::OutOfRange {
                index: self.index,
                requested: n,
                end: self.end,
            })?
            .copy_from_slice(src);
        self.advance(n);
        Ok(n)
    }

    /// Step over `n` bytes without copying them
    pub fn skip(&mut self, n: usize) -> Result<()> {
        if self.store.is_none() {
            return Err(Error::Uninitialized);
        }
        if n > self.remaining() {
            return Err(self.out_of_range(n));
        }
        self.advance(n);
        Ok(())
    }

    /// Carve the next `size` bytes into a child window and move past them
    pub fn sub_window(&mut self, size: usize) -> Result<Cursor> {
        if self.store.is_none() {
            return Err(Error::Uninitialized);
        }
        if size > self.remaining() {
            return Err(self.out_of_range(size));
        }
        let child = Cursor {
            store: self.store,
            start: self.index,
            index: self.index,
            end: self.index + size,
            data_offset: self.data_offset,
            root: false,
        };
        self.advance(size);
        Ok(child)
    }

    /// Open a window of `size` bytes at absolute `offset` in the same store
    ///
    /// The parent's position is not touched.
    pub fn sub_window_at(&self, arena: &BufferArena, offset: usize, size: usize) -> Result<Cursor> {
        let store_len = arena.store(self.store)?.len();
        let end = offset
            .checked_add(size)
            .filter(|&end| end <= store_len)
            .ok_or(Error::OutOfRange {
                index: offset,
                requested: size,
                end: store_len,
            })?;
        Ok(Cursor {
            store: self.store,
            start: offset,
            index: offset,
            end,
            data_offset: offset,
            root: false,
        })
    }

    /// True exactly when the position has reached the window bound
    pub fn at_end(&self) -> bool {
        self.index == self.end
    }

    /// Rewind to the start of the window
    pub fn reset(&mut self) {
        self.data_offset -= self.index - self.start;
        self.index = self.start;
    }

    /// Position relative to the start of the window
    pub fn position(&self) -> usize {
        self.index - self.start
    }

    /// Absolute position in the backing store
    pub fn index(&self) -> usize {
        self.index
    }

    /// Size of the window in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Bytes left between the position and the window bound
    pub fn remaining(&self) -> usize {
        self.end.saturating_sub(self.index)
    }

    pub fn data_offset(&self) -> usize {
        self.data_offset
    }

    pub fn is_root(&self) -> bool {
        self.root
    }

    pub fn is_attached(&self) -> bool {
        self.store.is_some()
    }

    // Little-endian scalar readers

    pub fn read_u8(&mut self, arena: &BufferArena) -> Result<u8> {
        Ok(self.read_slice(arena, 1)?[0])
    }

    pub fn read_u32(&mut self, arena: &BufferArena) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_slice(arena, 4)?))
    }

    pub fn read_i32(&mut self, arena: &BufferArena) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_slice(arena, 4)?))
    }

    pub fn read_i64(&mut self, arena: &BufferArena) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.read_slice(arena, 8)?))
    }

    pub fn read_f32(&mut self, arena: &BufferArena) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.read_slice(arena, 4)?))
    }

    pub fn read_f64(&mut self, arena: &BufferArena) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.read_slice(arena, 8)?))
    }

    /// Read u32-length-prefixed text, dropping the NUL padding at its end
    pub fn read_string(&mut self, arena: &BufferArena) -> Result<DbString> {
        let len = self.read_u32(arena)? as usize;
        Ok(DbString::from_padded(self.read_slice(arena, len)?))
    }

    // Little-endian scalar writers (strict)

    pub fn write_u8(&mut self, arena: &mut BufferArena, value: u8) -> Result<()> {
        self.write(arena, &[value], false).map(drop)
    }

    pub fn write_u32(&mut self, arena: &mut BufferArena, value: u32) -> Result<()> {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, value);
        self.write(arena, &buf, false).map(drop)
    }

    pub fn write_i32(&mut self, arena: &mut BufferArena, value: i32) -> Result<()> {
        let mut buf = [0u8; 4];
        LittleEndian::write_i32(&mut buf, value);
        self.write(arena, &buf, false).map(drop)
    }

    /// Write `text` with its u32 length prefix
    pub fn write_string(&mut self, arena: &mut BufferArena, text: &[u8]) -> Result<()> {
        self.write_u32(arena, text.len() as u32)?;
        self.write(arena, text, false).map(drop)
    }

    fn advance(&mut self, n: usize) {
        self.index += n;
        self.data_offset += n;
    }

    fn out_of_range(&self, requested: usize) -> Error {
        Error::OutOfRange {
            index: self.index,
            requested,
            end: self.end,
        }
    }
}
