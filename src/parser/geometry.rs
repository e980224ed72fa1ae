use crate::error::DaeError;
use crate::model::{MeshData, VertexSkinData, WEIGHTS_PER_VERTEX};
use crate::parser::query::{NodeRef, out_of_range};
use log::{debug, info};
use nalgebra_glm as glm;

/// One output vertex. Duplicates share position and skin with their origin
/// and differ in the (texture, normal) pair.
#[derive(Debug, Clone)]
struct Vertex {
    position: glm::Vec3,
    length: f32,
    texture_index: Option<usize>,
    normal_index: Option<usize>,
    duplicate: Option<usize>, // next vertex in the duplicate chain
    skin: usize,              // index into the skin data list
}

impl Vertex {
    fn new(position: glm::Vec3, skin: usize) -> Self {
        Self {
            position,
            length: glm::length(&position),
            texture_index: None,
            normal_index: None,
            duplicate: None,
            skin,
        }
    }

    fn is_set(&self) -> bool {
        self.texture_index.is_some() && self.normal_index.is_some()
    }

    fn has_same_texture_and_normal(&self, texture_index: usize, normal_index: usize) -> bool {
        self.texture_index == Some(texture_index) && self.normal_index == Some(normal_index)
    }
}

/// Vertex arena plus the index list built while visiting polygon corners.
#[derive(Debug, Default)]
struct VertexTable {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl VertexTable {
    fn push(&mut self, vertex: Vertex) -> usize {
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }

    /// Resolves one polygon corner to an output vertex and records its index.
    /// `position` must be below the number of raw positions.
    fn process_vertex(&mut self, position: usize, normal: usize, texture: usize) -> usize {
        let current = &mut self.vertices[position];
        if !current.is_set() {
            current.texture_index = Some(texture);
            current.normal_index = Some(normal);
            self.indices.push(position as u32);
            return position;
        }
        self.deal_with_already_processed_vertex(position, texture, normal)
    }

    fn deal_with_already_processed_vertex(&mut self, mut previous: usize, texture: usize, normal: usize) -> usize {
        loop {
            let vertex = &self.vertices[previous];
            if vertex.has_same_texture_and_normal(texture, normal) {
                self.indices.push(previous as u32);
                return previous;
            }
            match vertex.duplicate {
                Some(next) => previous = next,
                None => {
                    let mut duplicate = Vertex::new(vertex.position, vertex.skin);
                    duplicate.texture_index = Some(texture);
                    duplicate.normal_index = Some(normal);
                    let index = self.push(duplicate);
                    self.vertices[previous].duplicate = Some(index);
                    self.indices.push(index as u32);
                    return index;
                }
            }
        }
    }

    fn remove_unused_vertices(&mut self) {
        for vertex in &mut self.vertices {
            if !vertex.is_set() {
                vertex.texture_index = Some(0);
                vertex.normal_index = Some(0);
            }
        }
    }
}

/// Builds render arrays from `library_geometries`, deduplicating corners that
/// share a position but not a (normal, texcoord) pair.
pub fn extract_geometry(
    geometries: &NodeRef<'_>,
    skin: &[VertexSkinData],
    correction: &glm::Mat4,
) -> Result<MeshData, DaeError> {
    let mesh = geometries.child("geometry")?.child("mesh")?;
    let polylist = mesh.child("polylist")?;

    let mut table = VertexTable::default();
    read_positions(&mesh, skin, correction, &mut table)?;
    let raw_positions = table.vertices.len();
    let normals = read_normals(&mesh, &polylist, correction)?;
    let textures = read_texture_coords(&mesh, &polylist)?;

    assemble_vertices(&polylist, &mut table)?;
    table.remove_unused_vertices();

    let data = convert_data_to_arrays(&table, &normals, &textures, skin, &polylist)?;
    info!(
        "Loaded mesh: {} vertices ({} duplicated), {} indices",
        data.vertex_count(),
        data.vertex_count() - raw_positions,
        data.indices.len()
    );
    Ok(data)
}

/// `float_array` of source `id`, cut to its `count` attribute and grouped by `stride`.
fn read_source_floats(mesh: &NodeRef<'_>, id: &str, stride: usize) -> Result<Vec<f32>, DaeError> {
    let array = mesh.child_with_attribute("source", "id", id)?.child("float_array")?;
    let count = array.count()?;
    let mut values = array.floats()?;
    if values.len() < count {
        return Err(DaeError::new("truncated-data")
            .with_arg("path", array.path())
            .with_arg("len", values.len())
            .with_arg("expected", count));
    }
    values.truncate(count / stride * stride);
    Ok(values)
}

fn read_positions(
    mesh: &NodeRef<'_>,
    skin: &[VertexSkinData],
    correction: &glm::Mat4,
    table: &mut VertexTable,
) -> Result<(), DaeError> {
    let input = mesh.child("vertices")?.child("input")?;
    let values = read_source_floats(mesh, input.source_id()?, 3)?;
    for (i, p) in values.chunks_exact(3).enumerate() {
        if i >= skin.len() {
            return Err(out_of_range(input.path(), "vertex skin data", i, skin.len()));
        }
        let corrected = correction * glm::vec4(p[0], p[1], p[2], 1.0);
        table.push(Vertex::new(corrected.xyz(), i));
    }
    Ok(())
}

fn read_normals(mesh: &NodeRef<'_>, polylist: &NodeRef<'_>, correction: &glm::Mat4) -> Result<Vec<glm::Vec3>, DaeError> {
    let input = polylist.child_with_attribute("input", "semantic", "NORMAL")?;
    let values = read_source_floats(mesh, input.source_id()?, 3)?;
    Ok(values
        .chunks_exact(3)
        .map(|n| (correction * glm::vec4(n[0], n[1], n[2], 0.0)).xyz())
        .collect())
}

fn read_texture_coords(mesh: &NodeRef<'_>, polylist: &NodeRef<'_>) -> Result<Vec<glm::Vec2>, DaeError> {
    let input = polylist.child_with_attribute("input", "semantic", "TEXCOORD")?;
    let values = read_source_floats(mesh, input.source_id()?, 2)?;
    Ok(values.chunks_exact(2).map(|t| glm::vec2(t[0], t[1])).collect())
}

fn assemble_vertices(polylist: &NodeRef<'_>, table: &mut VertexTable) -> Result<(), DaeError> {
    let type_count = polylist.children("input").len();
    if type_count < 3 {
        return Err(DaeError::new("invalid-polylist")
            .with_arg("path", polylist.path())
            .with_arg("inputs", type_count));
    }
    let p = polylist.child("p")?;
    let index_data = p.ints()?;
    let raw_positions = table.vertices.len();

    for corner in index_data.chunks_exact(type_count) {
        let position = corner[0] as usize;
        if position >= raw_positions {
            return Err(out_of_range(p.path(), "position", position, raw_positions));
        }
        table.process_vertex(position, corner[1] as usize, corner[2] as usize);
    }
    debug!("{} polygon corners with {type_count} inputs each", index_data.len() / type_count);
    Ok(())
}

fn convert_data_to_arrays(
    table: &VertexTable,
    normals: &[glm::Vec3],
    textures: &[glm::Vec2],
    skin: &[VertexSkinData],
    polylist: &NodeRef<'_>,
) -> Result<MeshData, DaeError> {
    let count = table.vertices.len();
    let mut data = MeshData {
        vertices: Vec::with_capacity(count * 3),
        texture_coords: Vec::with_capacity(count * 2),
        normals: Vec::with_capacity(count * 3),
        indices: table.indices.clone(),
        joint_ids: Vec::with_capacity(count * WEIGHTS_PER_VERTEX),
        vertex_weights: Vec::with_capacity(count * WEIGHTS_PER_VERTEX),
        furthest_point: 0.0,
    };

    for (i, vertex) in table.vertices.iter().enumerate() {
        if vertex.length > data.furthest_point {
            data.furthest_point = vertex.length;
        }
        let texture_index = vertex.texture_index.unwrap_or(0);
        let normal_index = vertex.normal_index.unwrap_or(0);
        let texture = textures
            .get(texture_index)
            .ok_or_else(|| out_of_range(polylist.path(), "texcoord", texture_index, textures.len()))?;
        let normal = normals
            .get(normal_index)
            .ok_or_else(|| out_of_range(polylist.path(), "normal", normal_index, normals.len()))?;
        let weights = &skin[vertex.skin];
        if weights.len() < WEIGHTS_PER_VERTEX {
            return Err(DaeError::new("insufficient-skin-weights")
                .with_arg("vertex", i)
                .with_arg("len", weights.len())
                .with_arg("expected", WEIGHTS_PER_VERTEX));
        }

        data.vertices.extend_from_slice(&[vertex.position.x, vertex.position.y, vertex.position.z]);
        data.texture_coords.extend_from_slice(&[texture.x, 1.0 - texture.y]);
        data.normals.extend_from_slice(&[normal.x, normal.y, normal.z]);
        data.joint_ids.extend_from_slice(&weights.joint_ids[..WEIGHTS_PER_VERTEX]);
        data.vertex_weights.extend_from_slice(&weights.weights[..WEIGHTS_PER_VERTEX]);
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(positions: usize) -> VertexTable {
        let mut table = VertexTable::default();
        for i in 0..positions {
            table.push(Vertex::new(glm::vec3(i as f32, 0.0, 0.0), i));
        }
        table
    }

    #[test]
    fn identical_corners_share_one_slot() {
        let mut table = table_with(4);
        for (p, n, t) in [(0, 0, 0), (1, 0, 0), (2, 1, 1), (2, 1, 1), (3, 1, 1), (0, 0, 0)] {
            table.process_vertex(p, n, t);
        }
        assert_eq!(table.vertices.len(), 4);
        assert_eq!(table.indices, vec![0, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn each_distinct_pair_gets_a_chained_duplicate() {
        let mut table = table_with(2);
        let a = table.process_vertex(0, 0, 0);
        let b = table.process_vertex(0, 1, 0);
        let c = table.process_vertex(0, 1, 1);
        let b_again = table.process_vertex(0, 1, 0);
        let a_again = table.process_vertex(0, 0, 0);

        assert_eq!((a, b, c), (0, 2, 3));
        assert_eq!(b_again, b);
        assert_eq!(a_again, a);
        assert_eq!(table.indices, vec![0, 2, 3, 2, 0]);
        assert_eq!(table.vertices.len(), 4);

        // 0 -> 2 -> 3
        assert_eq!(table.vertices[0].duplicate, Some(2));
        assert_eq!(table.vertices[2].duplicate, Some(3));
        assert_eq!(table.vertices[3].duplicate, None);
        for dup in [2, 3] {
            assert_eq!(table.vertices[dup].position, table.vertices[0].position);
            assert_eq!(table.vertices[dup].skin, table.vertices[0].skin);
        }
        assert_eq!(table.vertices[3].texture_index, Some(1));
        assert_eq!(table.vertices[3].normal_index, Some(1));
    }

    #[test]
    fn unreferenced_vertices_default_to_zero() {
        let mut table = table_with(3);
        table.process_vertex(1, 2, 1);
        assert!(!table.vertices[0].is_set());
        table.remove_unused_vertices();
        assert_eq!(table.vertices[0].texture_index, Some(0));
        assert_eq!(table.vertices[0].normal_index, Some(0));
        assert_eq!(table.vertices[1].texture_index, Some(1));
        assert_eq!(table.vertices[1].normal_index, Some(2));
    }

    const TRIANGLE: &str = r##"<?xml version="1.0"?>
<library_geometries>
  <geometry id="Tri-mesh" name="Tri">
    <mesh>
      <source id="Tri-mesh-positions">
        <float_array id="Tri-mesh-positions-array" count="9">0 0 0 1 0 0 0 1 0</float_array>
      </source>
      <source id="Tri-mesh-normals">
        <float_array id="Tri-mesh-normals-array" count="3">0 0 1</float_array>
      </source>
      <source id="Tri-mesh-map-0">
        <float_array id="Tri-mesh-map-0-array" count="4">0 0 1 1</float_array>
      </source>
      <vertices id="Tri-mesh-vertices">
        <input semantic="POSITION" source="#Tri-mesh-positions"/>
      </vertices>
      <polylist count="1">
        <input semantic="VERTEX" source="#Tri-mesh-vertices" offset="0"/>
        <input semantic="NORMAL" source="#Tri-mesh-normals" offset="1"/>
        <input semantic="TEXCOORD" source="#Tri-mesh-map-0" offset="2" set="0"/>
        <vcount>3 </vcount>
        <p>0 0 0 1 0 1 2 0 0</p>
      </polylist>
    </mesh>
  </geometry>
</library_geometries>
"##;

    fn rigid_skin(count: usize) -> Vec<VertexSkinData> {
        (0..count)
            .map(|_| {
                let mut data = VertexSkinData::new();
                data.add_joint_effect(0, 1.0);
                data.limit_joint_number(WEIGHTS_PER_VERTEX);
                data
            })
            .collect()
    }

    fn geometry(doc: &str, skin: &[VertexSkinData]) -> Result<MeshData, DaeError> {
        let root = crate::parser::markup::parse_markup(doc).unwrap();
        extract_geometry(&NodeRef::root(&root), skin, &glm::Mat4::identity())
    }

    #[test]
    fn triangle_flattens_in_corner_order() {
        let mesh = geometry(TRIANGLE, &rigid_skin(3)).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.tex_coord(1), [1.0, 0.0]);
        assert_eq!(mesh.normal(2), [0.0, 0.0, 1.0]);
        assert_eq!(mesh.furthest_point, 1.0);
    }

    #[test]
    fn source_arrays_are_cut_to_their_count() {
        // two positions with skin for only two; a third would be out of range
        let doc = TRIANGLE
            .replace("count=\"9\">0 0 0 1 0 0 0 1 0", "count=\"6\">0 0 0 1 0 0 0 1 0")
            .replace("<p>0 0 0 1 0 1 2 0 0</p>", "<p>0 0 0 1 0 1 1 0 1</p>");
        let mesh = geometry(&doc, &rigid_skin(2)).unwrap();
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 1]);
    }

    #[test]
    fn count_past_the_data_is_truncated() {
        let doc = TRIANGLE.replace("count=\"9\">", "count=\"12\">");
        let err = geometry(&doc, &rigid_skin(4)).unwrap_err();
        assert_eq!(err.key, "truncated-data");
        assert_eq!(err.arg("len"), Some("9"));
        assert_eq!(err.arg("expected"), Some("12"));
    }

    #[test]
    fn polylist_needs_three_inputs() {
        let doc = TRIANGLE.replace(
            "        <input semantic=\"VERTEX\" source=\"#Tri-mesh-vertices\" offset=\"0\"/>\n",
            "",
        );
        let err = geometry(&doc, &rigid_skin(3)).unwrap_err();
        assert_eq!(err.key, "invalid-polylist");
        assert_eq!(err.arg("inputs"), Some("2"));
    }

    #[test]
    fn position_index_past_end_is_reported() {
        let doc = TRIANGLE.replace("<p>0 0 0 1 0 1 2 0 0</p>", "<p>0 0 0 1 0 1 5 0 0</p>");
        let err = geometry(&doc, &rigid_skin(3)).unwrap_err();
        assert_eq!(err.key, "index-out-of-range");
        assert_eq!(err.arg("what"), Some("position"));
        assert_eq!(err.arg("index"), Some("5"));
        assert_eq!(err.arg("len"), Some("3"));
    }

    #[test]
    fn normal_index_past_end_is_reported() {
        let doc = TRIANGLE.replace("<p>0 0 0 1 0 1 2 0 0</p>", "<p>0 0 0 1 3 1 2 0 0</p>");
        let err = geometry(&doc, &rigid_skin(3)).unwrap_err();
        assert_eq!(err.key, "index-out-of-range");
        assert_eq!(err.arg("what"), Some("normal"));
        assert_eq!(err.arg("index"), Some("3"));
        assert_eq!(err.arg("len"), Some("1"));
    }

    #[test]
    fn texcoord_cut_by_count_is_out_of_range() {
        let doc = TRIANGLE.replace("count=\"4\">0 0 1 1", "count=\"2\">0 0 1 1");
        let err = geometry(&doc, &rigid_skin(3)).unwrap_err();
        assert_eq!(err.key, "index-out-of-range");
        assert_eq!(err.arg("what"), Some("texcoord"));
        assert_eq!(err.arg("index"), Some("1"));
        assert_eq!(err.arg("len"), Some("1"));
    }

    #[test]
    fn missing_skin_for_a_position_is_reported() {
        let err = geometry(TRIANGLE, &rigid_skin(2)).unwrap_err();
        assert_eq!(err.key, "index-out-of-range");
        assert_eq!(err.arg("what"), Some("vertex skin data"));
        assert_eq!(err.arg("index"), Some("2"));
    }

    #[test]
    fn vertex_length_is_distance_from_origin() {
        let v = Vertex::new(glm::vec3(3.0, 4.0, 0.0), 0);
        assert_eq!(v.length, 5.0);
    }
}
