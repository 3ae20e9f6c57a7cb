mod user_form;
mod user_table;

pub use user_form::draw_user_form;
pub use user_table::draw_user_table;
