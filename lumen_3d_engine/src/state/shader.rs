/// Shader program binding and uniform values.
///
/// Programs are opaque handles created by the backend; this crate never
/// compiles shaders.

use std::sync::Arc;
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Linked program handle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderProgram {
    pub id: u32,
    pub name: String,
    /// Generic vertex attribute names the program reads
    pub attributes: Vec<String>,
}

/// Typed uniform value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

/// Named uniform assignment
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    pub name: String,
    pub value: UniformValue,
}

/// Active program (or fixed function when `program` is `None`).
///
/// Not interned; compares structurally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShaderState {
    program: Option<Arc<ShaderProgram>>,
    uniforms: Vec<Uniform>,
}

impl ShaderState {
    pub fn new(program: Arc<ShaderProgram>, uniforms: Vec<Uniform>) -> Self {
        Self { program: Some(program), uniforms }
    }

    /// Fixed-function pipeline
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn program(&self) -> Option<&Arc<ShaderProgram>> {
        self.program.as_ref()
    }

    pub fn uniforms(&self) -> &[Uniform] {
        &self.uniforms
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.iter().find(|u| u.name == name).map(|u| &u.value)
    }

    /// Attribute names read by the program (empty for fixed function)
    pub fn attributes(&self) -> &[String] {
        self.program.as_ref().map(|p| p.attributes.as_slice()).unwrap_or(&[])
    }
}
