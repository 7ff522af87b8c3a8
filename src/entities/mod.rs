pub mod invoice;
pub mod payment;
pub mod school;
pub mod student;

pub use invoice::Invoice;
pub use payment::Payment;
pub use school::School;
pub use student::Student;
