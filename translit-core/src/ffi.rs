//! C API for FFI bindings
//!
//! This module provides a C-compatible interface for building rule sets and
//! transliterating from input method frameworks written in other languages.
//! All functions are marked with #[unsafe(no_mangle)] and use C calling
//! conventions.
//!
//! A rule set is built through a builder handle and becomes immutable once
//! `translit_builder_build` returns. A built handle may be shared across
//! threads.

use crate::rule::PatternRule;
use crate::ruleset::{RuleSet, RuleSetBuilder};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};

/// Opaque handle to a rule set under construction
pub struct BuilderHandle {
    builder: RuleSetBuilder,
}

/// Opaque handle to a built rule set
pub struct RuleSetHandle {
    rule_set: RuleSet,
}

unsafe fn write_error(error: *mut *mut c_char, message: &str) {
    unsafe {
        if !error.is_null() {
            *error = CString::new(message).unwrap_or_default().into_raw();
        }
    }
}

/// Borrow a C string; null maps to `Ok(None)`
unsafe fn optional_str<'a>(ptr: *const c_char) -> Result<Option<&'a str>, &'static str> {
    unsafe {
        if ptr.is_null() {
            return Ok(None);
        }
        CStr::from_ptr(ptr)
            .to_str()
            .map(Some)
            .map_err(|_| "string is not valid UTF-8")
    }
}

/// Start a new rule set
///
/// # Safety
/// - id must be a valid null-terminated UTF-8 string
///
/// Returns null if id is null or not UTF-8
#[unsafe(no_mangle)]
pub unsafe extern "C" fn translit_builder_new(id: *const c_char) -> *mut BuilderHandle {
    unsafe {
        match optional_str(id) {
            Ok(Some(id)) => Box::into_raw(Box::new(BuilderHandle {
                builder: RuleSet::builder(id),
            })),
            _ => std::ptr::null_mut(),
        }
    }
}

/// Set rule set metadata
///
/// # Safety
/// - builder must be a valid builder handle
/// - each string must be null or a valid null-terminated UTF-8 string;
///   null leaves the field unchanged
///
/// Returns 0 on success, -1 on invalid arguments
#[unsafe(no_mangle)]
pub unsafe extern "C" fn translit_builder_set_info(
    builder: *mut BuilderHandle,
    name: *const c_char,
    description: *const c_char,
    author: *const c_char,
    version: *const c_char,
    max_key_length: usize,
    context_length: usize,
) -> c_int {
    unsafe {
        if builder.is_null() {
            return -1;
        }
        let (Ok(name), Ok(description), Ok(author), Ok(version)) = (
            optional_str(name),
            optional_str(description),
            optional_str(author),
            optional_str(version),
        ) else {
            return -1;
        };

        let handle = &mut *builder;
        let mut next = std::mem::replace(&mut handle.builder, RuleSetBuilder::new(""))
            .max_key_length(max_key_length)
            .context_length(context_length);
        if let Some(name) = name {
            next = next.name(name);
        }
        if let Some(description) = description {
            next = next.description(description);
        }
        if let Some(author) = author {
            next = next.author(author);
        }
        if let Some(version) = version {
            next = next.version(version);
        }
        handle.builder = next;
        0
    }
}

/// Append a rule
///
/// # Safety
/// - builder must be a valid builder handle
/// - input and replacement must be valid null-terminated UTF-8 strings
/// - context can be null for a rule without context
/// - error pointer can be null if you don't need error messages
///
/// Returns 0 on success, -1 if the rule does not compile
#[unsafe(no_mangle)]
pub unsafe extern "C" fn translit_builder_add_rule(
    builder: *mut BuilderHandle,
    input: *const c_char,
    context: *const c_char,
    replacement: *const c_char,
    alt_gr: c_int,
    error: *mut *mut c_char,
) -> c_int {
    unsafe {
        if builder.is_null() {
            write_error(error, "builder is null");
            return -1;
        }

        let (input, replacement, context) =
            match (optional_str(input), optional_str(replacement), optional_str(context)) {
                (Ok(Some(input)), Ok(Some(replacement)), Ok(context)) => (input, replacement, context),
                (Ok(None), _, _) | (_, Ok(None), _) => {
                    write_error(error, "input and replacement must not be null");
                    return -1;
                }
                _ => {
                    write_error(error, "string is not valid UTF-8");
                    return -1;
                }
            };

        let compiled = PatternRule::new(input, replacement).and_then(|rule| match context {
            Some(context) => rule.with_context(context),
            None => Ok(rule),
        });

        match compiled {
            Ok(rule) => {
                (*builder).builder.push_rule(rule.with_alt_gr(alt_gr != 0));
                0
            }
            Err(e) => {
                write_error(error, &e.to_string());
                -1
            }
        }
    }
}

/// Finish a rule set
///
/// # Safety
/// - builder must be a valid builder handle; it is consumed and must not be
///   used or freed afterwards
///
/// Returns null if builder is null
#[unsafe(no_mangle)]
pub unsafe extern "C" fn translit_builder_build(builder: *mut BuilderHandle) -> *mut RuleSetHandle {
    unsafe {
        if builder.is_null() {
            return std::ptr::null_mut();
        }
        let handle = Box::from_raw(builder);
        Box::into_raw(Box::new(RuleSetHandle {
            rule_set: handle.builder.build(),
        }))
    }
}

/// Free a builder that was never built
///
/// # Safety
/// - builder must be a valid pointer returned by translit_builder_new
/// - builder must not be used after calling this function
#[unsafe(no_mangle)]
pub unsafe extern "C" fn translit_builder_free(builder: *mut BuilderHandle) {
    unsafe {
        if !builder.is_null() {
            drop(Box::from_raw(builder));
        }
    }
}

/// Free a rule set handle
///
/// # Safety
/// - handle must be a valid pointer returned by translit_builder_build
/// - handle must not be used after calling this function
#[unsafe(no_mangle)]
pub unsafe extern "C" fn translit_free_rule_set(handle: *mut RuleSetHandle) {
    unsafe {
        if !handle.is_null() {
            drop(Box::from_raw(handle));
        }
    }
}

/// Transliterate a buffer
///
/// # Safety
/// - handle must be a valid rule set handle
/// - input must be a valid null-terminated UTF-8 string
/// - context can be null, which is the same as an empty context
/// - caller must free the returned string with translit_free_string
///
/// Returns null on invalid arguments
#[unsafe(no_mangle)]
pub unsafe extern "C" fn translit_transliterate(
    handle: *const RuleSetHandle,
    input: *const c_char,
    context: *const c_char,
    alt_gr: c_int,
) -> *mut c_char {
    unsafe {
        if handle.is_null() {
            return std::ptr::null_mut();
        }
        let (Ok(Some(input)), Ok(context)) = (optional_str(input), optional_str(context)) else {
            return std::ptr::null_mut();
        };

        let output = (*handle)
            .rule_set
            .transliterate(input, context.unwrap_or(""), alt_gr != 0);
        match CString::new(output) {
            Ok(cstr) => cstr.into_raw(),
            Err(_) => std::ptr::null_mut(),
        }
    }
}

/// Number of rules in a rule set, or -1 if handle is null
///
/// # Safety
/// - handle must be a valid rule set handle
#[unsafe(no_mangle)]
pub unsafe extern "C" fn translit_rule_count(handle: *const RuleSetHandle) -> c_int {
    unsafe {
        if handle.is_null() {
            return -1;
        }
        c_int::try_from((*handle).rule_set.len()).unwrap_or(c_int::MAX)
    }
}

/// Free a string returned by the API
///
/// # Safety
/// - ptr must be a valid pointer returned by this API
/// - ptr must not be used after calling this function
#[unsafe(no_mangle)]
pub unsafe extern "C" fn translit_free_string(ptr: *mut c_char) {
    unsafe {
        if !ptr.is_null() {
            drop(CString::from_raw(ptr));
        }
    }
}

/// Free an error string
///
/// # Safety
/// - ptr must be a valid error pointer returned by this API
#[unsafe(no_mangle)]
pub unsafe extern "C" fn translit_free_error(ptr: *mut c_char) {
    unsafe {
        translit_free_string(ptr);
    }
}

/// Get the API version
#[unsafe(no_mangle)]
pub extern "C" fn translit_version() -> *const c_char {
    const VERSION: &[u8] = b"0.1.0\0";
    VERSION.as_ptr() as *const c_char
}
