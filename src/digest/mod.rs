mod render;

pub use render::{build_email_body, render_digest, wrap_html_document};
