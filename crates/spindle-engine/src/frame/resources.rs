use crate::error::{EngineError, EngineResult};

use super::constants::{aligned_size, ColorMultiplier, WvpConstants};

/// CPU-writable, GPU-readable memory backing one constant block of one slot.
///
/// A region is created once and stays writable until teardown; there is no
/// per-frame map/unmap.
pub trait SlotRegion {
    /// Size of the backing region in bytes.
    fn size(&self) -> u64;

    /// Copies `bytes` to the start of the region.
    fn write(&mut self, bytes: &[u8]);
}

/// Plain heap region, used when no device is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRegion {
    bytes: Vec<u8>,
}

impl HostRegion {
    pub fn new(size: u64) -> Self {
        Self { bytes: vec![0; size as usize] }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl SlotRegion for HostRegion {
    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn write(&mut self, bytes: &[u8]) {
        self.bytes[..bytes.len()].copy_from_slice(bytes);
    }
}

/// Uniform buffer written through the queue's staging memory.
pub struct UniformRegion {
    buffer: wgpu::Buffer,
    queue: wgpu::Queue,
}

impl UniformRegion {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        size: u64,
    ) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, queue: queue.clone() }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

impl SlotRegion for UniformRegion {
    fn size(&self) -> u64 {
        self.buffer.size()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.queue.write_buffer(&self.buffer, 0, bytes);
    }
}

/// The two constant regions of one frame slot.
#[derive(Debug)]
pub struct FrameSlot<R> {
    pub color: R,
    pub wvp: R,
}

/// One set of constant regions per frame in flight.
///
/// Writing a slot while the GPU may still read it is the caller's
/// responsibility to prevent; see `FramePipeline`.
#[derive(Debug)]
pub struct FrameResourceSet<R: SlotRegion> {
    slots: Vec<FrameSlot<R>>,
    color_size: u64,
    wvp_size: u64,
}

impl<R: SlotRegion> FrameResourceSet<R> {
    /// Builds the set, asking `alloc` for one region per constant block per slot.
    ///
    /// `alloc` receives `(slot, block name, rounded size)`. Each requested size is
    /// the block size rounded up to `alignment`.
    pub fn new<A>(slot_count: usize, alignment: u64, mut alloc: A) -> EngineResult<Self>
    where
        A: FnMut(usize, &'static str, u64) -> EngineResult<R>,
    {
        if slot_count == 0 {
            return Err(EngineError::ResourceAllocation {
                resource: "frame slots",
                detail: "at least one frame slot is required".into(),
            });
        }
        if !alignment.is_power_of_two() {
            return Err(EngineError::ResourceAllocation {
                resource: "frame slots",
                detail: format!("alignment {alignment} is not a power of two"),
            });
        }

        let color_size = aligned_size(std::mem::size_of::<ColorMultiplier>() as u64, alignment);
        let wvp_size = aligned_size(std::mem::size_of::<WvpConstants>() as u64, alignment);

        let mut slots = Vec::with_capacity(slot_count);
        for slot in 0..slot_count {
            let color = alloc(slot, "color multiplier", color_size)?;
            let wvp = alloc(slot, "wvp", wvp_size)?;
            check_region(&color, "color multiplier", color_size)?;
            check_region(&wvp, "wvp", wvp_size)?;
            slots.push(FrameSlot { color, wvp });
        }

        log::debug!(
            "frame resources: {slot_count} slots, color {color_size} B, wvp {wvp_size} B"
        );

        let mut set = Self { slots, color_size, wvp_size };
        for slot in 0..slot_count {
            set.write(slot, &ColorMultiplier::default(), &WvpConstants::default());
        }
        Ok(set)
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Rounded `(color, wvp)` region sizes.
    #[inline]
    pub fn region_sizes(&self) -> (u64, u64) {
        (self.color_size, self.wvp_size)
    }

    pub fn slot(&self, slot: usize) -> &FrameSlot<R> {
        &self.slots[slot]
    }

    /// Copies both constant blocks into `slot`'s regions.
    pub fn write(&mut self, slot: usize, color: &ColorMultiplier, wvp: &WvpConstants) {
        let s = &mut self.slots[slot];
        s.color.write(bytemuck::bytes_of(color));
        s.wvp.write(bytemuck::bytes_of(wvp));
    }
}

fn check_region<R: SlotRegion>(region: &R, resource: &'static str, required: u64) -> EngineResult<()> {
    if region.size() < required {
        return Err(EngineError::ResourceAllocation {
            resource,
            detail: format!("region holds {} bytes, {required} required", region.size()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::constants::CONSTANT_BUFFER_ALIGNMENT;

    fn host_set(slots: usize) -> FrameResourceSet<HostRegion> {
        FrameResourceSet::new(slots, CONSTANT_BUFFER_ALIGNMENT, |_, _, size| {
            Ok(HostRegion::new(size))
        })
        .unwrap()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn requests_rounded_sizes_per_slot() {
        let mut requests = Vec::new();
        FrameResourceSet::new(3, 256, |slot, name, size| {
            requests.push((slot, name, size));
            Ok(HostRegion::new(size))
        })
        .unwrap();
        assert_eq!(requests.len(), 6);
        assert!(requests.iter().all(|(_, _, size)| *size == 256));
        assert_eq!(requests[4], (2, "color multiplier", 256));
    }

    #[test]
    fn zero_slots_is_an_allocation_error() {
        let err = FrameResourceSet::new(0, 256, |_, _, s| Ok(HostRegion::new(s))).unwrap_err();
        assert_eq!(err.operation(), "resource allocation");
    }

    #[test]
    fn undersized_region_is_rejected() {
        let err = FrameResourceSet::new(2, 256, |_, _, _| Ok(HostRegion::new(16))).unwrap_err();
        assert!(matches!(err, EngineError::ResourceAllocation { resource: "color multiplier", .. }));
    }

    #[test]
    fn allocation_failure_propagates() {
        let err = FrameResourceSet::<HostRegion>::new(2, 256, |_, name, _| {
            Err(EngineError::ResourceAllocation { resource: name, detail: "out of memory".into() })
        })
        .unwrap_err();
        assert!(err.to_string().contains("out of memory"));
    }

    // ── write ─────────────────────────────────────────────────────────────

    #[test]
    fn write_touches_only_the_target_slot() {
        let mut set = host_set(2);
        let color = ColorMultiplier::new(0.25, 0.5, 0.75, 1.0);
        let wvp = WvpConstants::from_matrix(&glam::Mat4::from_scale(glam::Vec3::splat(2.0)));
        set.write(1, &color, &wvp);

        assert_eq!(&set.slot(1).color.bytes()[..16], bytemuck::bytes_of(&color));
        assert_eq!(&set.slot(1).wvp.bytes()[..64], bytemuck::bytes_of(&wvp));
        assert_eq!(&set.slot(0).color.bytes()[..16], bytemuck::bytes_of(&ColorMultiplier::default()));
        assert_eq!(&set.slot(0).wvp.bytes()[..64], bytemuck::bytes_of(&WvpConstants::default()));
    }

    #[test]
    fn padding_past_the_block_stays_zero() {
        let mut set = host_set(1);
        set.write(0, &ColorMultiplier::new(1.0, 1.0, 1.0, 1.0), &WvpConstants::default());
        assert!(set.slot(0).color.bytes()[16..].iter().all(|b| *b == 0));
        assert_eq!(set.region_sizes(), (256, 256));
    }
}
