//! GEOHOVER: GPU-free core of the hover-resolving point-cloud globe.
//!
//! Per frame the viewer feeds this crate a pointer sample and camera state and
//! gets back the hover texture coordinate for the point shader plus the popup
//! state to draw:
//!
//!   pointer → [`pick`] (ray vs. globe mesh) → [`SurfaceHit`]
//!           → [`hover`] → shader uniform (UV) + [`geo`] → [`lookup`]/[`place`]
//!           → [`popup`]
//!
//! Conventions:
//! - Unit sphere, +Y up, front centre at +Z (camera default is (0,0,4)).
//! - Texture space: u grows eastward from the antimeridian, v grows southward
//!   from the north pole, so an equirectangular map samples with wgpu's
//!   top-left texture origin.
//! - Geographic conversion is texture-space: `lon = u·360 − 180`,
//!   `lat = 90 − v·180`.

pub mod geo;
pub mod hover;
pub mod lookup;
pub mod pick;
pub mod place;
pub mod popup;
pub mod shading;
pub mod sphere;

pub use geo::GeoCoordinate;
pub use hover::{HoverFrame, HoverTracker};
pub use lookup::{LookupError, PlaceResolver};
pub use pick::{PointerSample, Ray, SurfaceHit, SurfaceSampler};
pub use place::{CountryTable, LocalResolver, PlaceInfo};
pub use popup::{PopupPhase, PopupState};
