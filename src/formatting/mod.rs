pub mod markdown;
pub mod messages;

pub use markdown::{escape_link_url, escape_markdown, truncate, truncate_markup, ELLIPSIS};
pub use messages::{
    compose_message, format_date, format_error, format_error_at, format_item, format_item_list,
};
