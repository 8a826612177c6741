//! Binary data packing for GLTF buffers.

use gltf_json as json;
use json::validation::Checked::Valid;

/// Buffer, views and accessors for one scene
#[derive(Default)]
pub(crate) struct PackedBuffer {
    pub data: Vec<u8>,
    pub views: Vec<json::buffer::View>,
    pub accessors: Vec<json::Accessor>,
}

impl PackedBuffer {
    fn align(&mut self) {
        while !self.data.len().is_multiple_of(4) {
            self.data.push(0);
        }
    }

    fn push_view(&mut self, bytes: &[u8], target: json::buffer::Target) -> u32 {
        self.align();
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);
        self.views.push(json::buffer::View {
            buffer: json::Index::new(0),
            byte_length: bytes.len().into(),
            byte_offset: Some(offset.into()),
            byte_stride: None,
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            target: Some(Valid(target)),
        });
        self.views.len() as u32 - 1
    }

    fn push_accessor(
        &mut self,
        view: u32,
        count: usize,
        component_type: json::accessor::ComponentType,
        type_: json::accessor::Type,
        bounds: Option<([f32; 3], [f32; 3])>,
    ) -> u32 {
        let (min, max) = match bounds {
            Some((min, max)) => (
                Some(json::Value::Array(
                    min.into_iter().map(json::Value::from).collect(),
                )),
                Some(json::Value::Array(
                    max.into_iter().map(json::Value::from).collect(),
                )),
            ),
            None => (None, None),
        };
        self.accessors.push(json::Accessor {
            buffer_view: Some(json::Index::new(view)),
            byte_offset: Some(0u64.into()),
            count: count.into(),
            component_type: Valid(json::accessor::GenericComponentType(component_type)),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(type_),
            min,
            max,
            name: None,
            normalized: false,
            sparse: None,
        });
        self.accessors.len() as u32 - 1
    }

    /// POSITION accessor (with the bounds glTF requires)
    pub fn positions(&mut self, positions: &[[f32; 3]]) -> u32 {
        let view = self.push_view(
            bytemuck::cast_slice(positions),
            json::buffer::Target::ArrayBuffer,
        );
        self.push_accessor(
            view,
            positions.len(),
            json::accessor::ComponentType::F32,
            json::accessor::Type::Vec3,
            Some(compute_bounds(positions)),
        )
    }

    pub fn vec3s(&mut self, values: &[[f32; 3]]) -> u32 {
        let view = self.push_view(bytemuck::cast_slice(values), json::buffer::Target::ArrayBuffer);
        self.push_accessor(
            view,
            values.len(),
            json::accessor::ComponentType::F32,
            json::accessor::Type::Vec3,
            None,
        )
    }

    pub fn vec4s(&mut self, values: &[[f32; 4]]) -> u32 {
        let view = self.push_view(bytemuck::cast_slice(values), json::buffer::Target::ArrayBuffer);
        self.push_accessor(
            view,
            values.len(),
            json::accessor::ComponentType::F32,
            json::accessor::Type::Vec4,
            None,
        )
    }

    pub fn vec2s(&mut self, values: &[[f32; 2]]) -> u32 {
        let view = self.push_view(bytemuck::cast_slice(values), json::buffer::Target::ArrayBuffer);
        self.push_accessor(
            view,
            values.len(),
            json::accessor::ComponentType::F32,
            json::accessor::Type::Vec2,
            None,
        )
    }

    pub fn indices(&mut self, indices: &[u32]) -> u32 {
        let view = self.push_view(
            bytemuck::cast_slice(indices),
            json::buffer::Target::ElementArrayBuffer,
        );
        self.push_accessor(
            view,
            indices.len(),
            json::accessor::ComponentType::U32,
            json::accessor::Type::Scalar,
            None,
        )
    }
}

fn compute_bounds(positions: &[[f32; 3]]) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for p in positions {
        for i in 0..3 {
            min[i] = min[i].min(p[i]);
            max[i] = max[i].max(p[i]);
        }
    }
    (min, max)
}
