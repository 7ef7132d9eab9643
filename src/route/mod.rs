use std::collections::BTreeMap;

use rocket::serde::json::{json, Value};
use rocket::{Build, Rocket, Route};

pub mod appeals;
pub mod auth;
pub mod bus;
pub mod canteen;
pub mod courses;
pub mod feedback;
pub mod lostfound;
pub mod projects;
pub mod quizzes;
pub mod timetable;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    data::{
        appeal as ad, bus as bd, canteen as cd, course as crs, feedback as fd, lostfound as lf,
        project as pd, quiz as qd, timetable as td,
        user::db::{UserLoginData, UserSignupData},
        user::UserResponse,
    },
    report::GroupTotal,
    resp::{jwt::doc::JWTAuth, problem::Problem},
    role::{AccountStatus, Role},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup,
        auth::login,
        auth::me,
        auth::access_requests,
        auth::decide_access_request,
        auth::delete_user,
        courses::course_list,
        courses::course_get,
        courses::course_create,
        courses::course_update,
        courses::course_delete,
        quizzes::quiz_list,
        quizzes::quiz_get,
        quizzes::quiz_create,
        quizzes::quiz_update,
        quizzes::quiz_delete,
        quizzes::quiz_submit,
        quizzes::quiz_results,
        quizzes::quiz_results_all,
        timetable::timetable_get,
        timetable::timetable_save,
        timetable::timetable_delete,
        canteen::menu_list,
        canteen::menu_create,
        canteen::menu_update,
        canteen::menu_delete,
        canteen::booking_list,
        canteen::booking_create,
        canteen::booking_update,
        canteen::booking_delete,
        canteen::dashboard_top_items,
        canteen::dashboard_orders_per_day,
        bus::route_list,
        bus::route_create,
        bus::booking_list,
        bus::booking_create,
        bus::booking_cancel,
        bus::booking_export,
        bus::dashboard_popular_routes,
        bus::dashboard_reservations_per_day,
        lostfound::item_list,
        lostfound::item_get,
        lostfound::item_create,
        lostfound::item_update,
        lostfound::item_delete,
        appeals::appeal_list,
        appeals::appeal_get,
        appeals::appeal_create,
        appeals::appeal_set_status,
        projects::project_list,
        projects::project_get,
        projects::project_create,
        projects::project_set_status,
        feedback::feedback_list,
        feedback::feedback_create
    ),
    components(schemas(
        Role,
        AccountStatus,
        Problem,
        GroupTotal,
        UserResponse,
        UserSignupData,
        UserLoginData,
        auth::SignupResponse,
        auth::LoginResponse,
        auth::AccessDecision,
        crs::Course,
        crs::CourseData,
        qd::Question,
        qd::Quiz,
        qd::QuizData,
        qd::QuizResult,
        qd::QuizSubmission,
        qd::SubmitResponse,
        td::Timetable,
        td::TimetableCell,
        td::TimetableData,
        cd::MenuItem,
        cd::MenuItemData,
        cd::CanteenBooking,
        cd::CanteenBookingData,
        bd::BusRoute,
        bd::BusRouteData,
        bd::BusBooking,
        bd::BusBookingData,
        bd::BookingStatus,
        lf::LostFoundItem,
        lf::LostFoundItemData,
        lf::ItemKind,
        lf::ItemStatus,
        ad::GradeAppeal,
        ad::GradeAppealData,
        ad::AppealStatus,
        ad::AppealStatusUpdate,
        pd::Project,
        pd::ProjectData,
        pd::ProjectStatus,
        pd::ProjectStatusUpdate,
        fd::Feedback,
        fd::FeedbackData
    )),
    modifiers(&JWTAuth, &API_PREFIX)
)]
pub struct ApiDoc;

pub struct PathPrefix(pub &'static str);
static API_PREFIX: PathPrefix = PathPrefix("/api");

impl utoipa::Modify for PathPrefix {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut new_paths = BTreeMap::new();

        for (path, item) in std::mem::take(&mut openapi.paths.paths) {
            new_paths.insert(self.0.to_string() + path.as_ref(), item);
        }

        openapi.paths.paths = new_paths;
    }
}

#[get("/")]
pub fn api_status() -> Value {
    json!({ "message": "UniTracker API is running" })
}

pub fn api_routes() -> Vec<Route> {
    routes![
        auth::signup,
        auth::login,
        auth::me,
        auth::access_requests,
        auth::decide_access_request,
        auth::delete_user,
        courses::course_list,
        courses::course_get,
        courses::course_create,
        courses::course_update,
        courses::course_delete,
        quizzes::quiz_list,
        quizzes::quiz_get,
        quizzes::quiz_create,
        quizzes::quiz_update,
        quizzes::quiz_delete,
        quizzes::quiz_submit,
        quizzes::quiz_results,
        quizzes::quiz_results_all,
        timetable::timetable_get,
        timetable::timetable_save,
        timetable::timetable_delete,
        canteen::menu_list,
        canteen::menu_create,
        canteen::menu_update,
        canteen::menu_delete,
        canteen::booking_list,
        canteen::booking_create,
        canteen::booking_update,
        canteen::booking_delete,
        canteen::dashboard_top_items,
        canteen::dashboard_orders_per_day,
        bus::route_list,
        bus::route_create,
        bus::booking_list,
        bus::booking_create,
        bus::booking_cancel,
        bus::booking_export,
        bus::dashboard_popular_routes,
        bus::dashboard_reservations_per_day,
        lostfound::item_list,
        lostfound::item_get,
        lostfound::item_create,
        lostfound::item_update,
        lostfound::item_delete,
        appeals::appeal_list,
        appeals::appeal_get,
        appeals::appeal_create,
        appeals::appeal_set_status,
        projects::project_list,
        projects::project_get,
        projects::project_create,
        projects::project_set_status,
        feedback::feedback_list,
        feedback::feedback_create
    ]
}

pub fn mount_api(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .mount("/api", api_routes())
        .mount(
            "/",
            SwaggerUi::new("/swagger/<_..>").url("/api/openapi.json", ApiDoc::openapi()),
        )
        .mount("/", routes![api_status])
}
