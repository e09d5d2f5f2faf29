//! Route paths of the surfaced task endpoints.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const TASKS: &str = "/";
pub const TASK_CREATE: &str = "/task-create/";
pub const TASK_REORDER: &str = "/task-reorder/";
pub const DEFAULT_LOGIN_URL: &str = "/login/";

/// Query-value escaping that leaves path separators readable
const NEXT_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn task_detail(id: u32) -> String {
    format!("/task/{}/", id)
}

pub fn task_update(id: u32) -> String {
    format!("/task-update/{}/", id)
}

pub fn task_delete(id: u32) -> String {
    format!("/task-delete/{}/", id)
}

/// Login URL carrying `next` as the return target
pub fn login_redirect(login_url: &str, next: &str) -> String {
    format!("{}?next={}", login_url, utf8_percent_encode(next, NEXT_ESCAPE))
}
