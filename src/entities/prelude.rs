pub use super::academic_years::Entity as AcademicYears;
pub use super::attendance::Entity as Attendance;
pub use super::departments::Entity as Departments;
pub use super::enrollments::Entity as Enrollments;
pub use super::programs::Entity as Programs;
pub use super::students::Entity as Students;
pub use super::teachers::Entity as Teachers;
pub use super::users::Entity as Users;
