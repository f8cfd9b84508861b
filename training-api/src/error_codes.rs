//! Error code catalogue
//!
//! Codes follow `training_<resource>_<method>_<nnn>`:
//! - `0xx`: the record named by the path (or the list query) is unusable
//! - `1xx`: a body field failed validation
//! - `2xx`: the caller is not allowed to perform the operation

const LIST_INVALID: &str = "One or more of the sent search fields contains invalid values. \
     Please check the sent parameters and ensure they match the required patterns.";
const SELF_MANAGED: &str =
    "You do not have permission to make this request. Your Member must be self-managed.";
const SYLLABUS_PK: &str =
    "The \"pk\" path parameter is invalid. \"pk\" must belong to a valid Syllabus record.";
const CLS_PK: &str =
    "The \"pk\" path parameter is invalid. \"pk\" must belong to a valid Class record.";
const STUDENT_PK: &str =
    "The \"pk\" path parameter is invalid. \"pk\" must belong to a valid Student record.";
const NAME_REQUIRED: &str =
    "The \"name\" parameter is invalid. \"name\" is required and must be a string.";
const NAME_TOO_LONG: &str =
    "The \"name\" parameter is invalid. \"name\" cannot be longer than 50 characters.";
const NAME_TAKEN: &str =
    "The \"name\" parameter is invalid. A Syllabus with that name already exists.";
const START_DATE_INVALID: &str = "The \"start_date\" parameter is invalid. \
     \"start_date\" is required and must be a date in ISO format.";
const FINISH_BEFORE_START: &str = "The \"finish_date\" parameter is invalid. \
     \"finish_date\" cannot be before the specified \"start_date\".";
const SYLLABUS_ID_INVALID: &str =
    "The \"syllabus_id\" parameter is invalid. \"syllabus_id\" is required and must be an integer.";
const SYLLABUS_ID_MISSING: &str =
    "The \"syllabus_id\" parameter is invalid. \"syllabus_id\" must belong to a valid Syllabus.";
const TRAINER_REQUIRED: &str =
    "The \"trainer\" parameter is invalid. \"trainer\" is required and must be a string.";
const TRAINER_TOO_LONG: &str =
    "The \"trainer\" parameter is invalid. \"trainer\" cannot be longer than 50 characters.";
const CLS_ID_INVALID: &str =
    "The \"cls_id\" parameter is invalid. \"cls_id\" is required and must be an integer.";
const CLS_ID_MISSING: &str =
    "The \"cls_id\" parameter is invalid. \"cls_id\" must belong to a valid Class.";
const USER_ID_INVALID: &str =
    "The \"user_id\" parameter is invalid. \"user_id\" is required and must be an integer.";
const USER_ID_UNREADABLE: &str =
    "The \"user_id\" parameter is invalid. You do not have permission to read this record.";

/// Every code the service can emit, with its English description
pub const CATALOGUE: &[(&str, &str)] = &[
    // Service-wide
    (
        "training_auth_001",
        "Authentication credentials were not provided or are not valid.",
    ),
    (
        "training_request_001",
        "The request body is invalid. It must be a JSON object.",
    ),
    (
        "training_internal_001",
        "An unexpected error occurred while processing the request.",
    ),
    // Syllabus
    ("training_syllabus_list_001", LIST_INVALID),
    ("training_syllabus_create_101", NAME_REQUIRED),
    ("training_syllabus_create_102", NAME_TOO_LONG),
    ("training_syllabus_create_103", NAME_TAKEN),
    ("training_syllabus_create_201", SELF_MANAGED),
    ("training_syllabus_read_001", SYLLABUS_PK),
    (
        "training_syllabus_read_201",
        "You do not have permission to execute this method. You can only read a Syllabus for your Member.",
    ),
    ("training_syllabus_update_001", SYLLABUS_PK),
    ("training_syllabus_update_101", NAME_REQUIRED),
    ("training_syllabus_update_102", NAME_TOO_LONG),
    ("training_syllabus_update_103", NAME_TAKEN),
    (
        "training_syllabus_update_201",
        "You do not have permission to execute this method. You can only update a Syllabus in your Member.",
    ),
    ("training_syllabus_delete_001", SYLLABUS_PK),
    (
        "training_syllabus_delete_201",
        "You do not have permission to execute this method. You can only delete a Syllabus in your Member.",
    ),
    (
        "training_syllabus_delete_202",
        "You do not have permission to execute this method. \
         The specified Syllabus has a Class with students assigned to it.",
    ),
    // Class
    ("training_cls_list_001", LIST_INVALID),
    ("training_cls_create_101", START_DATE_INVALID),
    (
        "training_cls_create_102",
        "The \"finish_date\" parameter is invalid. \"finish_date\" must be a date in ISO format.",
    ),
    ("training_cls_create_103", FINISH_BEFORE_START),
    ("training_cls_create_104", SYLLABUS_ID_INVALID),
    ("training_cls_create_105", SYLLABUS_ID_MISSING),
    ("training_cls_create_106", TRAINER_REQUIRED),
    ("training_cls_create_107", TRAINER_TOO_LONG),
    ("training_cls_create_201", SELF_MANAGED),
    (
        "training_cls_create_202",
        "You do not have permission to execute this method. You can only create a Class in your Member.",
    ),
    ("training_cls_read_001", CLS_PK),
    (
        "training_cls_read_201",
        "You do not have permission to execute this method. You can only read a Class in your Member.",
    ),
    ("training_cls_update_001", CLS_PK),
    ("training_cls_update_101", START_DATE_INVALID),
    (
        "training_cls_update_102",
        "The \"finish_date\" parameter is invalid. \"finish_date\" is required and must be a date in ISO format.",
    ),
    ("training_cls_update_103", FINISH_BEFORE_START),
    ("training_cls_update_104", SYLLABUS_ID_INVALID),
    ("training_cls_update_105", SYLLABUS_ID_MISSING),
    ("training_cls_update_106", TRAINER_REQUIRED),
    ("training_cls_update_107", TRAINER_TOO_LONG),
    (
        "training_cls_update_201",
        "You do not have permission to execute this method. You can only update a Class in your Member.",
    ),
    ("training_cls_delete_001", CLS_PK),
    (
        "training_cls_delete_201",
        "You do not have permission to execute this method. You can only delete a Class in your Member.",
    ),
    (
        "training_cls_delete_202",
        "You do not have permission to make this request. The specified Class has Students in it.",
    ),
    // Student
    ("training_student_list_001", LIST_INVALID),
    ("training_student_create_101", CLS_ID_INVALID),
    ("training_student_create_102", CLS_ID_MISSING),
    ("training_student_create_103", USER_ID_INVALID),
    ("training_student_create_104", USER_ID_UNREADABLE),
    ("training_student_create_201", SELF_MANAGED),
    (
        "training_student_create_202",
        "You do not have permission to execute this method. You can only create a Student in your Member.",
    ),
    ("training_student_read_001", STUDENT_PK),
    (
        "training_student_read_201",
        "You do not have permission to execute this method. You can only read a Student in your Member.",
    ),
    ("training_student_update_001", STUDENT_PK),
    ("training_student_update_101", CLS_ID_INVALID),
    ("training_student_update_102", CLS_ID_MISSING),
    ("training_student_update_103", USER_ID_INVALID),
    ("training_student_update_104", USER_ID_UNREADABLE),
    (
        "training_student_update_201",
        "You do not have permission to execute this method. You can only update a Student in your Member.",
    ),
    ("training_student_delete_001", STUDENT_PK),
    (
        "training_student_delete_201",
        "You do not have permission to execute this method. You can only delete a Student in your Member.",
    ),
];

const UNKNOWN: &str = "An error occurred.";

/// Look up the description for an error code
pub fn detail(code: &str) -> &'static str {
    CATALOGUE
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, detail)| *detail)
        .unwrap_or(UNKNOWN)
}
