//! # Buffer State Module
//!
//! A registry of the editor's GPU buffers, keyed by name.
//!
//! ## Key Features
//!
//! * Named buffers shared between the pipeline and the voxel renderer
//! * Bounds-checked writes that never overrun an allocation
//! * Per-buffer memory accounting, logged at startup
//!
//! The renderer creates three buffers: the cube vertices, the instance list
//! (sized for a completely filled grid) and the scene uniform.

use std::collections::HashMap;

use log::error;
use wgpu::{util::DeviceExt, Buffer, Device, Queue};

use crate::core::StSystem;

/// Memory accounting for one buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferAnalytics {
    /// Size of the allocation in bytes
    pub allocated_memory: u64,
    /// Highest byte written so far
    pub used_memory: u64,
    pub times_written: u64,
}

impl BufferAnalytics {
    fn new(allocated_memory: u64) -> Self {
        Self {
            allocated_memory,
            ..Default::default()
        }
    }

    /// Whether `len` bytes at `offset` fit inside the allocation.
    pub fn fits(&self, offset: u64, len: u64) -> bool {
        offset
            .checked_add(len)
            .is_some_and(|end| end <= self.allocated_memory)
    }

    fn record_write(&mut self, offset: u64, len: u64) {
        self.used_memory = self.used_memory.max(offset + len);
        self.times_written += 1;
    }
}

/// Central registry for the editor's GPU buffers.
pub struct BufferState {
    device: StSystem<Device>,
    queue: StSystem<Queue>,
    buffers: HashMap<&'static str, Buffer>,
    buffer_analytics: HashMap<&'static str, BufferAnalytics>,
}

impl BufferState {
    pub fn new(device: StSystem<Device>, queue: StSystem<Queue>) -> Self {
        Self {
            device,
            queue,
            buffers: HashMap::new(),
            buffer_analytics: HashMap::new(),
        }
    }

    /// Creates an uninitialised buffer under `buffer_name`, replacing any
    /// buffer already registered with that name.
    pub fn create_buffer(&mut self, buffer_name: &'static str, descriptor: wgpu::BufferDescriptor) {
        let buffer = self.device.get().create_buffer(&descriptor);

        self.buffers.insert(buffer_name, buffer);
        self.buffer_analytics
            .insert(buffer_name, BufferAnalytics::new(descriptor.size));
    }

    /// Creates a buffer filled with the descriptor's contents.
    pub fn create_buffer_init(
        &mut self,
        buffer_name: &'static str,
        descriptor: wgpu::util::BufferInitDescriptor,
    ) {
        let size = descriptor.contents.len() as u64;
        let buffer = self.device.get().create_buffer_init(&descriptor);

        let mut analytics = BufferAnalytics::new(size);
        analytics.record_write(0, size);

        self.buffers.insert(buffer_name, buffer);
        self.buffer_analytics.insert(buffer_name, analytics);
    }

    /// Queues a write of `data` at `offset` into the named buffer.
    ///
    /// Unknown buffers and writes past the end of the allocation are logged
    /// and skipped.
    ///
    /// # Returns
    /// `true` if the write was queued
    pub fn write_buffer(
        &mut self,
        buffer_name: &'static str,
        offset: wgpu::BufferAddress,
        data: &[u8],
    ) -> bool {
        let (Some(buffer), Some(analytics)) = (
            self.buffers.get(buffer_name),
            self.buffer_analytics.get_mut(buffer_name),
        ) else {
            error!("Write to unknown buffer '{}'", buffer_name);
            return false;
        };

        let data_size = data.len() as u64;
        if !analytics.fits(offset, data_size) {
            error!(
                "Buffer write out of bounds for buffer '{}': {} bytes at {} (size {})",
                buffer_name, data_size, offset, analytics.allocated_memory
            );
            return false;
        }

        self.queue.get().write_buffer(buffer, offset, data);
        analytics.record_write(offset, data_size);
        true
    }

    pub fn get_buffer(&self, buffer_name: &'static str) -> Option<&Buffer> {
        self.buffers.get(buffer_name)
    }

    /// A binding resource covering the whole named buffer.
    pub fn get_entire_binding(&self, buffer_name: &'static str) -> Option<wgpu::BindingResource<'_>> {
        self.buffers
            .get(buffer_name)
            .map(|buffer| buffer.as_entire_binding())
    }

    /// Total bytes allocated across all buffers.
    pub fn get_total_allocated_memory(&self) -> u64 {
        self.buffer_analytics
            .values()
            .map(|analytics| analytics.allocated_memory)
            .sum()
    }

    /// Total bytes written across all buffers.
    pub fn get_total_used_memory(&self) -> u64 {
        self.buffer_analytics
            .values()
            .map(|analytics| analytics.used_memory)
            .sum()
    }
}
