//! Core 3MF types and structures

use super::boolean_ops::BooleanShape;

/// 3MF extension specification
///
/// Only the extensions this crate writes are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    /// Core 3MF specification (always required)
    Core,
    /// Boolean Operations Extension
    BooleanOperations,
}

impl Extension {
    /// Get the namespace URI for this extension
    pub fn namespace(&self) -> &'static str {
        match self {
            Extension::Core => "http://schemas.microsoft.com/3dmanufacturing/core/2015/02",
            Extension::BooleanOperations => {
                "http://schemas.3mf.io/3dmanufacturing/booleanoperations/2023/07"
            }
        }
    }

    /// XML namespace prefix used when writing
    pub fn prefix(&self) -> &'static str {
        match self {
            Extension::Core => "",
            Extension::BooleanOperations => "bo",
        }
    }
}

/// A 3D vertex with x, y, z coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Vertex {
    /// Create a new vertex
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A triangle defined by three vertex indices
///
/// Vertices run counter-clockwise when seen from outside the solid.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Index of first vertex
    pub v1: usize,
    /// Index of second vertex
    pub v2: usize,
    /// Index of third vertex
    pub v3: usize,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v1: usize, v2: usize, v3: usize) -> Self {
        Self { v1, v2, v3 }
    }
}

/// A 3D mesh containing vertices and triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// List of vertices
    pub vertices: Vec<Vertex>,
    /// List of triangles
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new mesh with pre-allocated capacity
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
        }
    }
}

/// A component referencing another object (assemblies)
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Referenced object ID
    pub objectid: usize,
}

impl Component {
    /// Create a new component with the given object reference
    pub fn new(objectid: usize) -> Self {
        Self { objectid }
    }
}

/// A 3D object holding exactly one of: a mesh, components, or a boolean shape
///
/// All objects written by this crate are of type `model`.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Object ID
    pub id: usize,
    /// Object name (optional)
    pub name: Option<String>,
    /// Optional mesh data
    pub mesh: Option<Mesh>,
    /// Boolean shape definition (Boolean Operations extension)
    pub boolean_shape: Option<BooleanShape>,
    /// Components that reference other objects (assemblies)
    pub components: Vec<Component>,
}

impl Object {
    /// Create a new object
    pub fn new(id: usize) -> Self {
        Self {
            id,
            name: None,
            mesh: None,
            boolean_shape: None,
            components: Vec::new(),
        }
    }
}

/// Resources section containing objects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resources {
    /// List of objects, in definition order
    pub objects: Vec<Object>,
}

impl Resources {
    /// Create a new empty resources section
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an object by ID
    pub fn object(&self, id: usize) -> Option<&Object> {
        self.objects.iter().find(|o| o.id == id)
    }
}

/// An item to be built, referencing an object
#[derive(Debug, Clone, PartialEq)]
pub struct BuildItem {
    /// Reference to object ID
    pub objectid: usize,
    /// Optional placement on the build plate, in 3MF matrix order
    pub transform: Option<[f64; 12]>,
}

impl BuildItem {
    /// Create a new build item
    pub fn new(objectid: usize) -> Self {
        Self {
            objectid,
            transform: None,
        }
    }
}

/// Build section specifying which objects to manufacture
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Build {
    /// List of items to build
    pub items: Vec<BuildItem>,
}

impl Build {
    /// Create a new empty build section
    pub fn new() -> Self {
        Self::default()
    }
}

/// Metadata entry for 3MF package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    /// Name of the metadata entry
    pub name: String,
    /// Value of the metadata entry
    pub value: String,
}

impl MetadataEntry {
    /// Create a new metadata entry
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Complete 3MF model
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Unit of measurement (e.g., "millimeter", "inch")
    pub unit: String,
    /// Extensions the consumer must support
    pub required_extensions: Vec<Extension>,
    /// Metadata entries
    pub metadata: Vec<MetadataEntry>,
    /// Resources (objects)
    pub resources: Resources,
    /// Build specification
    pub build: Build,
}

impl Model {
    /// Create a new empty model
    pub fn new() -> Self {
        Self {
            unit: "millimeter".to_string(),
            required_extensions: Vec::new(),
            metadata: Vec::new(),
            resources: Resources::new(),
            build: Build::new(),
        }
    }

    /// Get metadata value by name
    pub fn get_metadata(&self, name: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value.as_str())
    }

    /// Mark an extension as required, once
    pub fn require_extension(&mut self, extension: Extension) {
        if extension != Extension::Core && !self.required_extensions.contains(&extension) {
            self.required_extensions.push(extension);
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}
