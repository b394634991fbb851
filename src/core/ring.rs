use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, Queue};

/// Uniform data uploaded once per frame: the combined
/// projection × view × model transform, exactly one 4×4 matrix (64 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShaderMatrices {
    pub clip_from_local: [[f32; 4]; 4],
}

/// Per-frame resource bundle: the uniform buffer the CPU rewrites each cycle
/// plus its bind group.
///
/// Invariant: the buffer must not be rewritten while the GPU may still read
/// it. Nothing here enforces that — the frame timeline's admission wait is
/// the sole mechanism, which is why a slot is only handed out by index after
/// admission.
pub struct FrameSlot {
    uniform: Buffer,
    bind_group: BindGroup,
}

impl FrameSlot {
    fn new(device: &Device, layout: &BindGroupLayout, index: usize) -> Self {
        let uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("Frame Slot {index} Uniform")),
            size: std::mem::size_of::<ShaderMatrices>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Frame Slot {index} Bind Group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });

        Self {
            uniform,
            bind_group,
        }
    }

    /// Upload this frame's transform.
    pub fn write(&self, queue: &Queue, matrices: ShaderMatrices) {
        queue.write_buffer(&self.uniform, 0, bytemuck::cast_slice(&[matrices]));
    }

    pub fn bind_group(&self) -> &BindGroup {
        &self.bind_group
    }
}

/// Fixed-size ring of per-frame slots, cycled by `frame index mod depth`.
///
/// Sized at construction to the frame-pacing depth and rebuilt wholesale on
/// resize (after a timeline drain). Slots are never added or removed while
/// the ring lives.
pub struct FrameRing {
    slots: Vec<FrameSlot>,
}

impl FrameRing {
    pub fn new(device: &Device, layout: &BindGroupLayout, depth: usize) -> Self {
        assert!(depth >= 1, "frame ring needs at least one slot");
        let slots = (0..depth)
            .map(|i| FrameSlot::new(device, layout, i))
            .collect();
        Self { slots }
    }

    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    /// Index must already be reduced mod depth; anything else is a
    /// programming error, not a recoverable condition.
    pub fn slot(&self, index: usize) -> &FrameSlot {
        assert!(
            index < self.slots.len(),
            "frame slot index {index} out of range (depth {})",
            self.slots.len()
        );
        &self.slots[index]
    }
}

/// Ring slot owning a given frame index.
pub fn slot_index(frame: u64, depth: usize) -> usize {
    (frame % depth as u64) as usize
}
