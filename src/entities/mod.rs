pub mod prelude;

pub mod academic_years;
pub mod attendance;
pub mod departments;
pub mod enrollments;
pub mod programs;
pub mod students;
pub mod teachers;
pub mod users;
