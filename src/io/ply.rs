//! PLY (Stanford polygon) format support.
//!
//! Besides vertices and polygon faces, bevel weights travel in an optional
//! `edge` element:
//!
//! ```text
//! element edge 12
//! property int vertex1
//! property int vertex2
//! property double bevel_weight
//! ```
//!
//! Edges listed there that no face uses are kept as loose (wire) edges.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{BevelError, Result};
use crate::mesh::{build_from_polygons, to_face_vertex, MeshIndex, PolyMesh, VertexId};

/// Load a mesh from a PLY file.
///
/// # Example
///
/// ```no_run
/// use finalbevel::io::ply;
/// use finalbevel::mesh::PolyMesh;
///
/// let mesh: PolyMesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<PolyMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    read(&mut reader).map_err(|e| match e {
        BevelError::LoadError { message, .. } => BevelError::LoadError {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })
}

/// Read a PLY mesh from any buffered reader.
///
/// Errors about the file's content come back as [`BevelError::LoadError`]
/// with an empty path; [`load`] fills it in.
pub fn read<R: BufRead, I: MeshIndex>(reader: &mut R) -> Result<PolyMesh<I>> {
    let fail = |message: String| BevelError::LoadError {
        path: Default::default(),
        message,
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(reader)
        .map_err(|e| fail(e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| fail("PLY file has no vertex element".to_string()))?;

    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let coord = |name: &str| {
            get_float_property(vertex, name)
                .ok_or_else(|| fail(format!("vertex missing {} coordinate", name)))
        };
        vertices.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| fail("PLY file has no face element".to_string()))?;

    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| fail("face missing vertex_indices property".to_string()))?;
        faces.push(indices);
    }

    if faces.is_empty() {
        return Err(fail("PLY file contains no faces".to_string()));
    }

    let mut mesh: PolyMesh<I> = build_from_polygons(&vertices, &faces)?;

    if let Some(edge_element) = ply.payload.get("edge") {
        for edge in edge_element {
            let (a, b) = match (
                get_index_property(edge, "vertex1"),
                get_index_property(edge, "vertex2"),
            ) {
                (Some(a), Some(b)) => (a, b),
                _ => return Err(fail("edge missing vertex1/vertex2".to_string())),
            };
            if a >= vertices.len() || b >= vertices.len() || a == b {
                return Err(BevelError::MissingEdge { v0: a, v1: b });
            }

            let weight = get_float_property(edge, "bevel_weight").unwrap_or(0.0);
            if !weight.is_finite() || weight < 0.0 {
                return Err(BevelError::NegativeWeight {
                    v0: a,
                    v1: b,
                    weight,
                });
            }

            let e = mesh.add_edge(VertexId::new(a), VertexId::new(b));
            mesh.set_edge_weight(e, weight);
        }
    }

    Ok(mesh)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_index_property(element: &DefaultElement, name: &str) -> Option<usize> {
    match element.get(name)? {
        Property::Int(v) if *v >= 0 => Some(*v as usize),
        Property::UInt(v) => Some(*v as usize),
        Property::Short(v) if *v >= 0 => Some(*v as usize),
        Property::UShort(v) => Some(*v as usize),
        Property::UChar(v) => Some(*v as usize),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save a mesh to a PLY file (ASCII format).
///
/// Every edge is written to the `edge` element, weighted or not, so loose
/// edges survive a round trip.
///
/// # Example
///
/// ```no_run
/// use finalbevel::io::ply;
/// use finalbevel::mesh::PolyMesh;
///
/// let mesh: PolyMesh = PolyMesh::new();
/// ply::save(&mesh, "output.ply").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &PolyMesh<I>, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh as ASCII PLY.
pub fn write<W: Write, I: MeshIndex>(mesh: &PolyMesh<I>, writer: &mut W) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    // Write header
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by finalbevel")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "element edge {}", mesh.num_edges())?;
    writeln!(writer, "property int vertex1")?;
    writeln!(writer, "property int vertex2")?;
    writeln!(writer, "property double bevel_weight")?;
    writeln!(writer, "end_header")?;

    for v in &vertices {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }

    for f in &faces {
        write!(writer, "{}", f.len())?;
        for vi in f {
            write!(writer, " {}", vi)?;
        }
        writeln!(writer)?;
    }

    for (_, e) in mesh.edges() {
        let [a, b] = e.vertices;
        writeln!(writer, "{} {} {}", a.index(), b.index(), e.bevel_weight)?;
    }

    Ok(())
}
