use crate::config::EngineConfig;
use crate::display::DisplayUpdate;
use crate::engine::AreaEngine;
use crate::error::{throw_java_exception, AreaEngineError, EngineResult};
use crate::events::{preferred_step_source, MotionEvent};
use jni::objects::{JClass, JFloatArray, JString};
use jni::sys::{jboolean, jdouble, jfloat, jint, jlong, jstring};
use jni::JNIEnv;
use std::sync::{Mutex, Once};

const LOG_TAG: &str = "OfflineLandArea";

// One engine per process; the mutex serializes sensor callbacks and UI calls
lazy_static::lazy_static! {
    static ref GLOBAL_ENGINE: Mutex<Option<AreaEngine>> = Mutex::new(None);
}

static LOGGER_INIT: Once = Once::new();

fn init_logging() {
    LOGGER_INIT.call_once(|| {
        #[cfg(target_os = "android")]
        {
            let _ = android_log::init(LOG_TAG);
        }
        log::info!("[{}] logging ready", LOG_TAG);
    });
}

/// Run `f` against the global engine, creating a default one on first use
fn with_engine<T>(f: impl FnOnce(&mut AreaEngine) -> T) -> EngineResult<T> {
    let mut guard = GLOBAL_ENGINE
        .lock()
        .map_err(|_| AreaEngineError::LockPoisoned("global engine".to_string()))?;
    let engine = guard.get_or_insert_with(AreaEngine::default);
    Ok(f(engine))
}

fn new_jstring(env: &mut JNIEnv, value: &str) -> EngineResult<jstring> {
    Ok(env.new_string(value)?.into_raw())
}

/// Serialize an update for Kotlin; `None` becomes a Java null
fn update_to_jstring(env: &mut JNIEnv, update: Option<DisplayUpdate>) -> EngineResult<jstring> {
    match update {
        Some(update) => {
            let json = update
                .to_json()
                .map_err(|e| AreaEngineError::Internal(format!("JSON serialization failed: {}", e)))?;
            new_jstring(env, &json)
        }
        None => Ok(std::ptr::null_mut()),
    }
}

fn read_optional_string(env: &mut JNIEnv, value: &JString) -> EngineResult<Option<String>> {
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(env.get_string(value)?.into()))
}

fn jstring_or_throw(env: &mut JNIEnv, result: EngineResult<jstring>) -> jstring {
    match result {
        Ok(value) => value,
        Err(e) => {
            let _ = throw_java_exception(env, &e);
            std::ptr::null_mut()
        }
    }
}

fn status_or_throw(env: &mut JNIEnv, result: EngineResult<()>) -> jint {
    match result {
        Ok(_) => 0,
        Err(e) => {
            let _ = throw_java_exception(env, &e);
            -1
        }
    }
}

/// JNI: Install logging and (re)create the engine from a JSON config.
/// A null or blank config uses defaults. Any session in progress is dropped.
/// Returns: 0 on success, -1 on error (throws Java exception)
#[no_mangle]
pub extern "C" fn Java_com_example_offlinelandarea_AreaEngineBinding_init(
    mut env: JNIEnv,
    _class: JClass,
    config_json: JString,
) -> jint {
    let result = init_impl(&mut env, &config_json);
    status_or_throw(&mut env, result)
}

fn init_impl(env: &mut JNIEnv, config_json: &JString) -> EngineResult<()> {
    init_logging();
    let config = match read_optional_string(env, config_json)? {
        Some(json) if !json.trim().is_empty() => EngineConfig::from_json(&json)?,
        _ => EngineConfig::default(),
    };

    let mut guard = GLOBAL_ENGINE
        .lock()
        .map_err(|_| AreaEngineError::LockPoisoned("global engine".to_string()))?;
    *guard = Some(AreaEngine::new(config));
    log::info!("[{}] engine initialized", LOG_TAG);
    Ok(())
}

/// JNI: Start (or restart) a session with the stride text from the input field
/// Returns: progress update JSON
#[no_mangle]
pub extern "C" fn Java_com_example_offlinelandarea_AreaEngineBinding_startSession(
    mut env: JNIEnv,
    _class: JClass,
    stride_text: JString,
) -> jstring {
    let result = start_session_impl(&mut env, &stride_text);
    jstring_or_throw(&mut env, result)
}

fn start_session_impl(env: &mut JNIEnv, stride_text: &JString) -> EngineResult<jstring> {
    let text = read_optional_string(env, stride_text)?.unwrap_or_default();
    let update = with_engine(|engine| engine.start(&text))?;
    update_to_jstring(env, Some(update))
}

/// JNI: Stop the session
/// Returns: area update JSON, or null when no session was running
#[no_mangle]
pub extern "C" fn Java_com_example_offlinelandarea_AreaEngineBinding_stopSession(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    let result = with_engine(|engine| engine.stop())
        .and_then(|update| update_to_jstring(&mut env, update));
    jstring_or_throw(&mut env, result)
}

/// JNI: Push a yaw sample (radians)
/// Returns: 0 on success, -1 on error (throws Java exception)
#[no_mangle]
pub extern "C" fn Java_com_example_offlinelandarea_AreaEngineBinding_onOrientationSample(
    mut env: JNIEnv,
    _class: JClass,
    yaw_radians: jdouble,
) -> jint {
    let result = with_engine(|engine| engine.on_orientation_sample(yaw_radians));
    status_or_throw(&mut env, result)
}

/// JNI: Push a raw rotation-vector sample (SensorEvent.values)
/// Returns: 0 on success, -1 on error (throws Java exception)
#[no_mangle]
pub extern "C" fn Java_com_example_offlinelandarea_AreaEngineBinding_onRotationVector(
    mut env: JNIEnv,
    _class: JClass,
    values: JFloatArray,
) -> jint {
    let result = on_rotation_vector_impl(&mut env, &values);
    status_or_throw(&mut env, result)
}

fn on_rotation_vector_impl(env: &mut JNIEnv, values: &JFloatArray) -> EngineResult<()> {
    let len = env.get_array_length(values)? as usize;
    let mut buf: Vec<jfloat> = vec![0.0; len];
    env.get_float_array_region(values, 0, &mut buf)?;
    let values: Vec<f64> = buf.iter().map(|v| *v as f64).collect();

    with_engine(|engine| {
        engine.handle(MotionEvent::RotationVector { values });
    })
}

/// JNI: Step detector event (SensorEvent.values[0])
/// Returns: progress update JSON, or null when the event recorded no step
#[no_mangle]
pub extern "C" fn Java_com_example_offlinelandarea_AreaEngineBinding_onStepDetected(
    mut env: JNIEnv,
    _class: JClass,
    value: jfloat,
) -> jstring {
    let event = MotionEvent::StepDetected {
        value: value as f64,
    };
    let result = with_engine(|engine| engine.handle(event))
        .and_then(|update| update_to_jstring(&mut env, update));
    jstring_or_throw(&mut env, result)
}

/// JNI: Step counter event (cumulative steps since boot)
/// Returns: progress update JSON, or null when the event recorded no step
#[no_mangle]
pub extern "C" fn Java_com_example_offlinelandarea_AreaEngineBinding_onStepCounterChanged(
    mut env: JNIEnv,
    _class: JClass,
    cumulative_count: jlong,
) -> jstring {
    let event = match counter_event(cumulative_count) {
        Some(event) => event,
        None => return std::ptr::null_mut(),
    };
    let result = with_engine(|engine| engine.handle(event))
        .and_then(|update| update_to_jstring(&mut env, update));
    jstring_or_throw(&mut env, result)
}

/// Negative counts never reach the engine, so they cannot become a baseline
fn counter_event(cumulative_count: jlong) -> Option<MotionEvent> {
    match u64::try_from(cumulative_count) {
        Ok(cumulative_count) => Some(MotionEvent::StepCounterChanged { cumulative_count }),
        Err(_) => {
            log::warn!("Ignoring negative step counter value {}", cumulative_count);
            None
        }
    }
}

/// JNI: Which step sensor to register
/// Returns: 1 = step detector, 2 = step counter, 0 = none available
#[no_mangle]
pub extern "C" fn Java_com_example_offlinelandarea_AreaEngineBinding_selectStepSource(
    _env: JNIEnv,
    _class: JClass,
    has_detector: jboolean,
    has_counter: jboolean,
) -> jint {
    preferred_step_source(has_detector != 0, has_counter != 0)
        .map(|source| source.code())
        .unwrap_or(0)
}

/// JNI: Get current session state
/// Returns: "IDLE" or "COLLECTING"
#[no_mangle]
pub extern "C" fn Java_com_example_offlinelandarea_AreaEngineBinding_getSessionState(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    let result = with_engine(|engine| engine.state().as_str())
        .and_then(|state| new_jstring(&mut env, state));
    jstring_or_throw(&mut env, result)
}

/// JNI: Snapshot of the current session as JSON
#[no_mangle]
pub extern "C" fn Java_com_example_offlinelandarea_AreaEngineBinding_getSessionJson(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    let result = get_session_json_impl(&mut env);
    jstring_or_throw(&mut env, result)
}

fn get_session_json_impl(env: &mut JNIEnv) -> EngineResult<jstring> {
    let summary = with_engine(|engine| engine.summary())?;
    let json = summary
        .to_json()
        .map_err(|_| AreaEngineError::Internal("JSON serialization failed".to_string()))?;
    new_jstring(env, &json)
}
