//! Data structures representing 3MF models

mod boolean_ops;
mod core;

pub use core::{
    Build, BuildItem, Component, Extension, Mesh, MetadataEntry, Model, Object, Resources,
    Triangle, Vertex,
};

pub use boolean_ops::{BooleanOpType, BooleanRef, BooleanShape};
