/// Wavefront OBJ parser (vertex positions and triangular faces only)
use log::{debug, warn};
use nalgebra::Vector3;
use nom::{
    bytes::complete::{is_not, tag},
    character::complete::{digit1, multispace1, space0},
    combinator::{map_res, opt},
    number::complete::float,
    sequence::{preceded, terminated},
    IResult,
};

use crate::geometry::{Mesh, Triangle};

/// Parse OBJ text into a mesh.
///
/// Only `v x y z` and `f a b c` lines are used; everything else is skipped.
/// Coordinates that fail to parse become NaN so later indices still line up.
/// Faces that point at vertices not yet seen are dropped.
pub fn parse_obj(input: &str) -> Mesh {
    let mut vertices: Vec<Vector3<f32>> = Vec::new();
    let mut mesh = Mesh::new();

    for (number, line) in input.lines().enumerate() {
        let line = line.trim();
        let keyword = line.split_whitespace().next().unwrap_or("");

        match keyword {
            "v" => match parse_vertex(line) {
                Ok((_, position)) => vertices.push(position),
                Err(e) => {
                    debug!("line {}: malformed vertex {:?}: {:?}", number + 1, line, e);
                    vertices.push(Vector3::repeat(f32::NAN));
                }
            },
            "f" => match parse_face(line) {
                Ok((_, indices)) => match lookup_face(&vertices, indices) {
                    Some(tri) => mesh.add_triangle(tri),
                    None => warn!(
                        "line {}: face {:?} references a missing vertex",
                        number + 1,
                        indices
                    ),
                },
                Err(e) => warn!("line {}: malformed face {:?}: {:?}", number + 1, line, e),
            },
            _ => {}
        }
    }

    debug!("parsed {} vertices, {} faces", vertices.len(), mesh.len());
    mesh
}

fn lookup_face(vertices: &[Vector3<f32>], indices: [usize; 3]) -> Option<Triangle> {
    let fetch = |i: usize| i.checked_sub(1).and_then(|i| vertices.get(i)).copied();

    Some(Triangle::new(
        fetch(indices[0])?,
        fetch(indices[1])?,
        fetch(indices[2])?,
    ))
}

fn parse_vertex(input: &str) -> IResult<&str, Vector3<f32>> {
    let (input, _) = tag("v")(input)?;
    let (input, x) = preceded(multispace1, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn parse_face(input: &str) -> IResult<&str, [usize; 3]> {
    let (input, _) = tag("f")(input)?;
    let (input, a) = preceded(multispace1, face_index)(input)?;
    let (input, b) = preceded(multispace1, face_index)(input)?;
    let (input, c) = preceded(multispace1, face_index)(input)?;
    let (input, _) = space0(input)?;
    Ok((input, [a, b, c]))
}

/// A 1-based vertex index, ignoring any `/texture/normal` suffix
fn face_index(input: &str) -> IResult<&str, usize> {
    terminated(
        map_res(digit1, |digits: &str| digits.parse::<usize>()),
        opt(preceded(tag("/"), opt(is_not(" \t")))),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_triangle() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        assert_eq!(mesh.len(), 1);
        let tri = &mesh.triangles[0];
        assert_eq!(tri.p[0], Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(tri.p[1], Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(tri.p[2], Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_ignores_other_lines() {
        let text = "# comment\r\no monke\nvn 0 0 1\nvt 0.5 0.5\n\
                    v -1.5 2 3e-1\r\nv 1 0 0\nv 0 1 0\ns off\nf 3 2 1\n";
        let mesh = parse_obj(text);
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.triangles[0].p[0], Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(mesh.triangles[0].p[2], Vector3::new(-1.5, 2.0, 0.3));
    }

    #[test]
    fn test_face_index_suffixes() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/4/2 2//1 3/9\n");
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.triangles[0].p[1], Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_only_first_three_face_indices() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n");
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.triangles[0].p[2], Vector3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_malformed_vertex_keeps_index() {
        let mesh = parse_obj("v 0 0 0\nv nope 0 0\nv 0 1 0\nv 1 1 1\nf 1 3 4\nf 1 2 3\n");
        assert_eq!(mesh.len(), 2);
        assert_eq!(mesh.triangles[0].p[2], Vector3::new(1.0, 1.0, 1.0));
        assert!(mesh.triangles[1].p[1].x.is_nan());
    }

    #[test]
    fn test_missing_vertex_drops_face() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nf 1 2 3\nf 0 1 2\n");
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_face_before_vertices_is_dropped() {
        let mesh = parse_obj("f 1 2 3\nv 0 0 0\nv 1 0 0\nv 0 1 0\n");
        assert!(mesh.is_empty());
    }
}
