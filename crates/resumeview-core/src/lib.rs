pub mod display;
pub mod record;
pub mod view;

pub use display::{DateStyle, display_or, format_upload_date};
pub use record::{Rating, RatingBand, RatingError, Record, RecordId, Summary};
pub use view::ViewState;
