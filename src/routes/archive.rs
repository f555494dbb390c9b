//! Archive page routes. Path parameters are typed: `:id` is an `i64` on donor and
//! scholarship routes and a `Uuid` on instance routes, so a malformed id is rejected with
//! 400 before any handler runs.

use crate::handlers::application::{all_applied, apply, apply_form, list_applicants, mark_status, my_applied};
use crate::handlers::donor::{
    confirm_delete_donor, create_donor, delete_donor, donor_detail, edit_donor, list_donors, update_donor,
};
use crate::handlers::index::{index, success};
use crate::handlers::scholarship::{
    confirm_delete_scholarship, create_scholarship, delete_scholarship, edit_scholarship, list_scholarships,
    scholarship_detail, update_scholarship,
};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn archive_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/scholarships/", get(list_scholarships))
        .route("/scholarship/:id", get(scholarship_detail))
        .route("/donors/", get(list_donors))
        .route("/donor/:id", get(donor_detail))
        .route("/applicants/", get(list_applicants))
        .route("/myscholarships/", get(my_applied))
        .route("/apply/", get(all_applied))
        .route("/success", get(success))
        .route("/scholarship/:id/apply/", get(apply_form).post(apply))
        .route("/scholarship/:id/status/", post(mark_status))
        .route("/donor/create/", post(create_donor))
        .route("/donor/:id/update/", get(edit_donor).post(update_donor))
        .route("/donor/:id/delete/", get(confirm_delete_donor).post(delete_donor))
        .route("/scholarship/create/", post(create_scholarship))
        .route("/scholarship/:id/update/", get(edit_scholarship).post(update_scholarship))
        .route("/scholarship/:id/delete/", get(confirm_delete_scholarship).post(delete_scholarship))
        .with_state(state)
}
