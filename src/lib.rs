#![forbid(unsafe_code)]
pub mod annotation;
pub mod builder;
pub mod config;
pub mod dataset;
pub mod error;
pub mod label;
pub mod model;
pub mod overpass;
pub mod page;
pub mod query_parameters;
pub mod regex_patterns;
pub mod render;
pub mod server;
pub mod tags;
pub mod travel;

pub use annotation::{Annotation, Category, MarkerStyle};
pub use builder::{AnnotationBuilder, BuildReport, FailurePolicy};
pub use error::{BuildWarning, CoordinateField, MalformedRecordError, Reason, RecordRef};
pub use model::{Bot, Coordinate, Poi, VisitType};
pub use render::{LeafletScript, MapRenderer, View, render_annotations};
pub use tags::{PoiTags, TagField};
pub use travel::travel_step;
