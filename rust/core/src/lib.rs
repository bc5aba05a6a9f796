// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Roof Core Reader
//!
//! Minimal STEP/IFC reader built with [nom](https://docs.rs/nom), covering
//! what is needed to find roof elements and the geometry behind them.
//!
//! ## Overview
//!
//! - **Entity Scanning**: one quote-aware pass over the DATA section using
//!   [memchr](https://docs.rs/memchr), indexing byte ranges by id and type
//! - **Lazy Decoding**: entities are parsed on demand and cached
//! - **Model Queries**: roofs, roof slabs, aggregation children, property
//!   and quantity set values, project length unit
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_roof_core::IfcModel;
//!
//! let model = IfcModel::open("house.ifc")?;
//! for &roof in model.roofs() {
//!     let info = model.element(roof)?;
//!     println!("#{} {} {:?}", info.id, info.type_name, info.name);
//!     for &child in model.aggregated_children(roof) {
//!         println!("  part #{}", child);
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for [`ElementInfo`]

pub mod decoder;
pub mod entity;
pub mod error;
pub mod header;
pub mod model;
pub mod parser;
pub mod schema;
pub mod units;

pub use decoder::{build_entity_index, EntityDecoder, EntityIndex};
pub use entity::{AttributeValue, DecodedEntity};
pub use error::{Error, Result};
pub use header::{locate_data_section, parse_file_schema};
pub use model::{ElementInfo, IfcModel};
pub use parser::{decode_step_string, parse_entity};
pub use schema::IfcType;
pub use units::{extract_length_unit_scale, get_si_prefix_multiplier};
