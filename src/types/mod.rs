pub mod category;
pub mod fragment;
pub mod parameter;
pub mod station;

pub use category::ApiCategory;
pub use fragment::{
    timestamp_from_minutes, DataParameter, ObservationFragment, ObservedValue, ParameterMeta,
};
pub use parameter::ParameterDescriptor;
pub use station::{StationDescriptor, StationKind};
