//! A growable, null-terminated byte string, written from the allocation up.
//!
//! # Purpose
//! This crate provides [`Buffer`], an owned byte sequence with explicit `len` and `capacity`
//! fields in front of a manually managed allocation. It exists for the places where [`String`] is
//! the wrong shape: the payload is raw bytes rather than UTF-8, a terminator byte is always kept
//! behind the payload for handoff to C-style consumers, and empty values share a single static
//! sentinel so they cost no allocation at all.
//!
//! # Method
//! The buffer is built directly on [`std::alloc`] - no [`Vec`] anywhere in this crate. Capacity
//! grows through a bucket-rounding policy that keeps the allocation footprint aligned with typical
//! allocator size classes, and the mutation primitives treat sources that alias the buffer's own
//! storage as a first-class case (see [`Buffer::extend_from_within`] and
//! [`Buffer::replace_from_within`]).
//!
//! # Error Handling
//! Allocation failure is fatal via [`std::alloc::handle_alloc_error`] and capacity arithmetic that
//! would overflow panics, which matches what users expect from a container type. The only
//! recoverable errors live at the I/O seam: delimited stream reads return strongly typed errors
//! rather than panicking, because a broken pipe is the caller's business.
#![feature(extend_one)]
#![feature(debug_closure_helpers)]
#![feature(doc_cfg)]

#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod buffer;

pub use buffer::Buffer;
