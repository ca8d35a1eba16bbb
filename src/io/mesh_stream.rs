//! The binary mesh stream (spec.md §6): header `{ vertexCount, indexCount,
//! materialCount }` followed by packed vertex records (position x3 f32,
//! normal x3 f32, uv x2 f32, tangent x4 f32) and `u32` indices. The
//! original's `s3d_bvh4.cpp` vertex layout carries the same tangent field
//! (SPEC_FULL.md §C), so `MeshVertex` keeps it even though no material here
//! consumes it yet.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::AssetError;
use crate::math::Vector3;
use crate::shapes::MeshVertex;

pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    /// Carried through from the header for forward compatibility; the
    /// stream format does not specify a per-material index partition, so
    /// this build assigns one material to every triangle of an imported
    /// mesh rather than guessing a layout (see DESIGN.md).
    pub material_count: u32,
}

pub fn write(writer: &mut impl Write, mesh: &MeshData) -> io::Result<()> {
    writer.write_u32::<LittleEndian>(mesh.vertices.len() as u32)?;
    writer.write_u32::<LittleEndian>(mesh.indices.len() as u32)?;
    writer.write_u32::<LittleEndian>(mesh.material_count)?;

    for v in &mesh.vertices {
        for component in [v.position.x, v.position.y, v.position.z, v.normal.x, v.normal.y, v.normal.z] {
            writer.write_f32::<LittleEndian>(component)?;
        }
        writer.write_f32::<LittleEndian>(v.uv.0)?;
        writer.write_f32::<LittleEndian>(v.uv.1)?;
        for component in [v.tangent.x, v.tangent.y, v.tangent.z, v.tangent_sign] {
            writer.write_f32::<LittleEndian>(component)?;
        }
    }
    for &index in &mesh.indices {
        writer.write_u32::<LittleEndian>(index)?;
    }
    Ok(())
}

pub fn read(reader: &mut impl Read, path: &str) -> Result<MeshData, AssetError> {
    let io_err = |source: io::Error| AssetError::Io { path: path.to_string(), source };
    let truncated = |what| AssetError::Truncated { path: path.to_string(), what };

    let vertex_count = reader.read_u32::<LittleEndian>().map_err(|_| truncated("header"))?;
    let index_count = reader.read_u32::<LittleEndian>().map_err(io_err)?;
    let material_count = reader.read_u32::<LittleEndian>().map_err(io_err)?;

    let mut read_f32 = |reader: &mut dyn Read| -> Result<f32, AssetError> {
        reader.read_f32::<LittleEndian>().map_err(|_| truncated("vertex data"))
    };

    let mut vertices = Vec::with_capacity(vertex_count as usize);
    for _ in 0..vertex_count {
        let position = Vector3::new(read_f32(reader)?, read_f32(reader)?, read_f32(reader)?);
        let normal = Vector3::new(read_f32(reader)?, read_f32(reader)?, read_f32(reader)?);
        let uv = (read_f32(reader)?, read_f32(reader)?);
        let tangent = Vector3::new(read_f32(reader)?, read_f32(reader)?, read_f32(reader)?);
        let tangent_sign = read_f32(reader)?;
        vertices.push(MeshVertex { position, normal, uv, tangent, tangent_sign });
    }

    let mut indices = Vec::with_capacity(index_count as usize);
    for _ in 0..index_count {
        indices.push(reader.read_u32::<LittleEndian>().map_err(|_| truncated("index data"))?);
    }

    Ok(MeshData { vertices, indices, material_count })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mesh() -> MeshData {
        let v = |x: f32, y: f32, z: f32| Vector3::new(x, y, z);
        MeshData {
            vertices: vec![
                MeshVertex { position: v(0.0, 0.0, 0.0), normal: v(0.0, 1.0, 0.0), uv: (0.0, 0.0), tangent: v(1.0, 0.0, 0.0), tangent_sign: 1.0 },
                MeshVertex { position: v(1.0, 0.0, 0.0), normal: v(0.0, 1.0, 0.0), uv: (1.0, 0.0), tangent: v(1.0, 0.0, 0.0), tangent_sign: 1.0 },
                MeshVertex { position: v(0.0, 1.0, 0.0), normal: v(0.0, 1.0, 0.0), uv: (0.0, 1.0), tangent: v(1.0, 0.0, 0.0), tangent_sign: -1.0 },
            ],
            indices: vec![0, 1, 2],
            material_count: 1,
        }
    }

    #[test]
    fn round_trips_byte_for_byte() {
        let mesh = sample_mesh();
        let mut buf = Vec::new();
        write(&mut buf, &mesh).unwrap();

        let mut buf2 = Vec::new();
        let decoded = read(&mut buf.as_slice(), "test.msh").unwrap();
        write(&mut buf2, &decoded).unwrap();

        assert_eq!(buf, buf2);
        assert_eq!(decoded.indices, mesh.indices);
        assert_eq!(decoded.vertices.len(), mesh.vertices.len());
    }

    #[test]
    fn truncated_stream_is_reported() {
        let bytes = [1, 0, 0, 0]; // vertexCount = 1, then nothing else
        let err = read(&mut &bytes[..], "bad.msh").unwrap_err();
        assert!(matches!(err, AssetError::Truncated { .. }));
    }
}
