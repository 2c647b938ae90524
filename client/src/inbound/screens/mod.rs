//! Screen flows.
//!
//! Each flow mirrors one page of the client: it reads the stores, runs the
//! validator where input is involved, and answers with a view model or the
//! route to navigate to next.

mod consultation_form;
mod dashboard;
mod login;

pub use consultation_form::{
    CREATE_RETRY, EditScreen, FormOutcome, UPDATE_RETRY, load_edit, new_consultation_form,
    submit_edit, submit_new,
};
pub use dashboard::{
    ConsultationRow, DELETE_CONFIRMATION, DashboardPage, DashboardView, DeleteOutcome, EMPTY_LIST,
    LOADING_MESSAGE, dashboard_view, delete_consultation,
};
pub use login::{LoginOutcome, logout, submit_login};
