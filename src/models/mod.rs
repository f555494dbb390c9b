//! Archive entities: row structs, form DTOs and display rules.

pub mod counts;
pub mod donor;
pub mod gpa;
pub mod instance;
pub mod scholarship;
pub mod scholarship_type;
pub mod student;
pub mod user;

pub use counts::*;
pub use donor::*;
pub use gpa::*;
pub use instance::*;
pub use scholarship::*;
pub use scholarship_type::*;
pub use student::*;
pub use user::*;

/// `"<last_name>, <first_name>"`, shared by donors and students.
pub fn person_display(first_name: &str, last_name: &str) -> String {
    format!("{}, {}", last_name, first_name)
}
