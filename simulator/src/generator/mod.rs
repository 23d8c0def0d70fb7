pub mod spillage;
pub mod template;
