mod archive;
mod arso;
mod date_range;
mod error;
mod export;
mod jsonify;
mod render;
mod table;
mod types;
mod volume;

pub use arso::*;
pub use error::ArsoError;

pub use archive::{ArchiveClient, ArchiveError, DEFAULT_BASE_URL};
pub use date_range::split_date_range;
pub use export::write_csv;
pub use jsonify::jsonify;
pub use render::render_table;
pub use table::{aggregate, Column, WideTable};
pub use volume::{VolumeEstimate, DEFAULT_TARGET_CHUNK_POINTS};

pub use types::{
    timestamp_from_minutes, ApiCategory, DataParameter, ObservationFragment, ObservedValue,
    ParameterDescriptor, ParameterMeta, StationDescriptor, StationKind,
};
