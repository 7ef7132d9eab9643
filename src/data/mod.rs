pub mod appeal;
pub mod bus;
pub mod canteen;
pub mod course;
pub mod feedback;
pub mod lostfound;
pub mod project;
pub mod quiz;
pub mod timetable;
pub mod user;
