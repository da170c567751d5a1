#![doc = include_str!("../README.md")]

mod decoder;
mod error;
pub mod geo;
mod location;
mod map;
mod model;
mod observer;

pub use decoder::candidates::Candidate;
pub use decoder::route::Route;
pub use decoder::scoring::DEFAULT_FOW_STAND_IN_SCORE;
pub use decoder::{
    DecoderConfig, decode_line, decode_point_along_line, decode_poi_with_access_point,
};
pub use error::DecodeError;
pub use location::{LineLocation, PoiWithAccessPoint, PointAlongLine};
pub use map::MapReader;
pub use model::{
    Bearing, Coordinate, Fow, Frc, Length, LineAttributes, LineReference,
    LocationReferencePoint, Offsets, Orientation, PathAttributes, PoiReference,
    PointAlongLineReference, SideOfRoad,
};
pub use observer::{DecoderObserver, ObservedEvent, SimpleObserver};
