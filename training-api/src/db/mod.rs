//! Database access layer for training-api
//!
//! Every read joins a record's parents so models arrive fully populated.
//! Select lists alias columns by table (`sy_`, `c_`, `st_`) so one row
//! mapper per table works in any join.
//!
//! "Live" means `deleted IS NULL`. Deletes are soft: they stamp `deleted`
//! and nothing is ever removed.

macro_rules! syllabus_columns {
    () => {
        "sy.id AS sy_id, sy.member_id AS sy_member_id, sy.name AS sy_name, \
         sy.description AS sy_description, sy.created AS sy_created, \
         sy.updated AS sy_updated, sy.deleted AS sy_deleted"
    };
}

macro_rules! cls_columns {
    () => {
        "c.id AS c_id, c.start_date AS c_start_date, c.finish_date AS c_finish_date, \
         c.trainer AS c_trainer, c.created AS c_created, c.updated AS c_updated, \
         c.deleted AS c_deleted"
    };
}

macro_rules! student_columns {
    () => {
        "st.id AS st_id, st.user_id AS st_user_id, st.notes AS st_notes, \
         st.created AS st_created, st.updated AS st_updated, st.deleted AS st_deleted"
    };
}

pub mod cls;
pub mod query;
pub mod student;
pub mod syllabus;
