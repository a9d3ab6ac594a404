//! STL mesh loading (ASCII and binary).
//!
//! ASCII files begin with the literal `solid`; anything else is treated as
//! binary: an 80-byte header, a little-endian u32 triangle count, then one
//! 50-byte record per triangle (12-byte normal, three 12-byte vertices,
//! 2-byte attribute; normal and attribute are discarded). A uniform scale
//! factor is multiplied into every vertex.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use lumen_math::Vec3;
use thiserror::Error;

use crate::mesh::Mesh;

/// Errors that can occur while loading an STL file.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed ASCII STL at line {line}: {reason}")]
    MalformedAscii { line: usize, reason: String },

    #[error("binary STL truncated: expected {expected} bytes of triangle data, found {found}")]
    Truncated { expected: usize, found: usize },
}

pub type MeshResult<T> = Result<T, MeshError>;

/// Load an STL file from disk.
pub fn load_stl<P: AsRef<Path>>(path: P, scale: f32) -> MeshResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mesh = read_stl(BufReader::new(file), scale)?;
    log::debug!(
        "loaded STL {} ({} triangles, scale {})",
        path.display(),
        mesh.triangle_count(),
        scale
    );
    Ok(mesh)
}

/// Read an STL mesh from any reader.
pub fn read_stl<R: Read>(mut reader: R, scale: f32) -> MeshResult<Mesh> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    if data.starts_with(b"solid") {
        read_ascii(&data, scale)
    } else {
        read_binary(&data, scale)
    }
}

fn read_ascii(data: &[u8], scale: f32) -> MeshResult<Mesh> {
    let text = String::from_utf8_lossy(data);
    let mut positions = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let mut fields = line.split_whitespace();
        if fields.next() != Some("vertex") {
            continue;
        }

        let mut coords = [0.0f32; 3];
        for coord in coords.iter_mut() {
            let field = fields.next().ok_or_else(|| MeshError::MalformedAscii {
                line: idx + 1,
                reason: "vertex line with fewer than 3 coordinates".to_string(),
            })?;
            *coord = field.parse().map_err(|_| MeshError::MalformedAscii {
                line: idx + 1,
                reason: format!("invalid coordinate {field:?}"),
            })?;
        }

        positions.push(Vec3::from_array(coords) * scale);
    }

    if positions.len() % 3 != 0 {
        return Err(MeshError::MalformedAscii {
            line: text.lines().count(),
            reason: format!("{} vertices do not form whole facets", positions.len()),
        });
    }

    let indices = (0..positions.len() as u32).collect();
    Ok(Mesh::new(positions, indices))
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn read_binary(data: &[u8], scale: f32) -> MeshResult<Mesh> {
    const HEADER: usize = 80;
    const RECORD: usize = 50;

    if data.len() < HEADER + 4 {
        return Err(MeshError::Truncated {
            expected: HEADER + 4,
            found: data.len(),
        });
    }

    let count = u32::from_le_bytes([
        data[HEADER],
        data[HEADER + 1],
        data[HEADER + 2],
        data[HEADER + 3],
    ]) as usize;

    let body = &data[HEADER + 4..];
    if body.len() < count * RECORD {
        return Err(MeshError::Truncated {
            expected: count * RECORD,
            found: body.len(),
        });
    }

    let mut positions = Vec::with_capacity(count * 3);
    for record in body.chunks_exact(RECORD).take(count) {
        // bytes 0..12 are the facet normal, 48..50 the attribute; both skipped
        for v in 0..3 {
            let base = 12 + v * 12;
            let x = read_f32(record, base);
            let y = read_f32(record, base + 4);
            let z = read_f32(record, base + 8);
            positions.push(Vec3::new(x, y, z) * scale);
        }
    }

    let indices = (0..positions.len() as u32).collect();
    Ok(Mesh::new(positions, indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_FACET: &str = "\
solid single
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid single
";

    fn binary_with(count: u32, triangles: &[[f32; 9]]) -> Vec<u8> {
        let mut data = vec![0u8; 80];
        data.extend_from_slice(&count.to_le_bytes());
        for tri in triangles {
            data.extend_from_slice(&[0u8; 12]); // normal, ignored
            for value in tri {
                data.extend_from_slice(&value.to_le_bytes());
            }
            data.extend_from_slice(&[0u8; 2]); // attribute, ignored
        }
        data
    }

    #[test]
    fn ascii_one_facet_scaled() {
        let mesh = read_stl(ONE_FACET.as_bytes(), 2.0).unwrap();
        assert_eq!(mesh.triangle_count(), 1);

        let tri = mesh.triangles()[0];
        assert_eq!(tri[0], Vec3::ZERO);
        assert_eq!(tri[1], Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(tri[2], Vec3::new(0.0, 2.0, 0.0));

        // flat on z: the AABB must still be padded to a minimum thickness
        let bounds = mesh.bounds;
        assert_eq!(bounds.x.min, 0.0);
        assert_eq!(bounds.x.max, 2.0);
        assert_eq!(bounds.y.min, 0.0);
        assert_eq!(bounds.y.max, 2.0);
        assert!(bounds.z.size() >= 1e-4);
        assert!(bounds.z.contains(0.0));
    }

    #[test]
    fn ascii_bad_coordinate_is_reported() {
        let text = "solid x\n facet\n outer loop\n vertex 0 0 oops\n";
        let err = read_stl(text.as_bytes(), 1.0).unwrap_err();
        match err {
            MeshError::MalformedAscii { line, .. } => assert_eq!(line, 4),
            other => panic!("expected MalformedAscii, got {other}"),
        }
    }

    #[test]
    fn ascii_incomplete_facet_is_reported() {
        let text = "solid x\n vertex 0 0 0\n vertex 1 0 0\n";
        assert!(matches!(
            read_stl(text.as_bytes(), 1.0),
            Err(MeshError::MalformedAscii { .. })
        ));
    }

    #[test]
    fn binary_roundtrip() {
        let data = binary_with(
            2,
            &[
                [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0],
            ],
        );
        let mesh = read_stl(data.as_slice(), 1.0).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangles()[1][0], Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn binary_scale_applies_to_vertices() {
        let data = binary_with(1, &[[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]]);
        let mesh = read_stl(data.as_slice(), 0.5).unwrap();
        assert_eq!(mesh.triangles()[0][1], Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn binary_truncated_is_an_error() {
        let mut data = binary_with(2, &[[0.0; 9]]);
        data.truncate(84 + 50); // promises 2 records, carries 1
        assert!(matches!(
            read_stl(data.as_slice(), 1.0),
            Err(MeshError::Truncated { .. })
        ));
    }

    #[test]
    fn binary_missing_count_is_an_error() {
        let data = vec![0u8; 60];
        assert!(matches!(
            read_stl(data.as_slice(), 1.0),
            Err(MeshError::Truncated { .. })
        ));
    }
}
