use nalgebra_glm as glm;

/// Scene node transform: value `15 - i` goes to row-major cell `i`, then transposed.
pub fn reversed_matrix(values: &[f32; 16]) -> glm::Mat4 {
    let mut cells = [0.0f32; 16];
    for (i, cell) in cells.iter_mut().enumerate() {
        *cell = values[15 - i];
    }
    glm::Mat4::from_row_slice(&cells).transpose()
}

/// Animation sample: value `i` goes to row-major cell `i`, then transposed.
pub fn row_major_matrix(values: &[f32; 16]) -> glm::Mat4 {
    glm::Mat4::from_row_slice(values).transpose()
}
