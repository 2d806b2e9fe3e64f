//! Android implementation using JNI.
//!
//! [`AndroidPlatform`] implements every collaborator trait against the host
//! `Activity`: `GoogleApiAvailability`, `FirebaseApp`, `JobScheduler` and
//! `NotificationManager`. The Java host drives the process-wide service
//! through the `PushNotificationsBridge` natives at the bottom of this file.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use async_channel::Receiver;
use jni::objects::{GlobalRef, JClass, JObject, JString, JValue};
use jni::{JNIEnv, JavaVM};

use crate::backend::{
    HostContext, JobScheduler, LaunchArgumentSink, NotificationService, PlatformCapabilities,
    PushServices,
};
use crate::{
    ChannelLaunchSink, KeepAliveJob, LaunchPayload, PushConfig, PushCredentials, PushError,
    PushNotificationsService, PushPlatform, PushResult,
};

use super::slot::{Binding, BridgeSlot};

/// `Build.VERSION_CODES.LOLLIPOP`.
const LOLLIPOP: i32 = 21;
/// `Build.VERSION_CODES.TIRAMISU`.
const TIRAMISU: i32 = 33;

/// `PackageManager.PERMISSION_GRANTED`.
const PERMISSION_GRANTED: i32 = 0;
/// `JobScheduler.RESULT_SUCCESS`.
const RESULT_SUCCESS: i32 = 1;

/// Launch payloads kept for the app when it does not drain
/// [`launch_payloads`]. The oldest is dropped first.
const LAUNCH_QUEUE_CAPACITY: usize = 16;

const JOB_SCHEDULER_SERVICE: &str = "jobscheduler";
const NOTIFICATION_SERVICE: &str = "notification";

const GOOGLE_API_AVAILABILITY: &str = "com/google/android/gms/common/GoogleApiAvailability";
const FIREBASE_APP: &str = "com/google/firebase/FirebaseApp";
const FIREBASE_OPTIONS_BUILDER: &str = "com/google/firebase/FirebaseOptions$Builder";
const FIREBASE_MESSAGING: &str = "com/google/firebase/messaging/FirebaseMessaging";

/// Collaborators backed by an Android `Activity`.
pub struct AndroidPlatform {
    vm: JavaVM,
    activity: Mutex<GlobalRef>,
    sdk_int: i32,
    job_service_class: String,
    messaging_service_class: Option<String>,
}

impl fmt::Debug for AndroidPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AndroidPlatform")
            .field("sdk_int", &self.sdk_int)
            .field("job_service_class", &self.job_service_class)
            .field("messaging_service_class", &self.messaging_service_class)
            .finish_non_exhaustive()
    }
}

impl AndroidPlatform {
    /// Bind to `activity`. Host class names are taken from `config`.
    ///
    /// # Errors
    /// Returns [`PushError::Platform`] if the JVM cannot be reached.
    pub fn new(env: &mut JNIEnv<'_>, activity: &JObject<'_>, config: &PushConfig) -> PushResult<Self> {
        let vm = env.get_java_vm().map_err(map_jni_error)?;
        let activity = env.new_global_ref(activity).map_err(map_jni_error)?;
        let sdk_int = env
            .get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
            .and_then(|value| value.i())
            .map_err(|e| clear_exception(env, e))?;

        Ok(Self {
            vm,
            activity: Mutex::new(activity),
            sdk_int,
            job_service_class: config.job_service_class.clone(),
            messaging_service_class: config.messaging_service_class.clone(),
        })
    }

    /// `Build.VERSION.SDK_INT` of the device.
    #[must_use]
    pub const fn sdk_int(&self) -> i32 {
        self.sdk_int
    }

    /// Point every later platform call at `activity`, releasing the previous one.
    ///
    /// # Errors
    /// Returns [`PushError::Platform`] if the global reference cannot be created.
    pub fn rebind(&self, env: &JNIEnv<'_>, activity: &JObject<'_>) -> PushResult<()> {
        let activity = env.new_global_ref(activity).map_err(map_jni_error)?;
        *self.activity.lock().unwrap_or_else(PoisonError::into_inner) = activity;
        Ok(())
    }

    fn with_env<T, F>(&self, action: F) -> PushResult<T>
    where
        F: FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> jni::errors::Result<T>,
    {
        let mut env = self.vm.attach_current_thread().map_err(map_jni_error)?;
        let activity = self
            .activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        action(&mut env, activity.as_obj()).map_err(|e| clear_exception(&mut env, e))
    }
}

fn map_jni_error(error: jni::errors::Error) -> PushError {
    PushError::Platform(error.to_string())
}

/// Clear a pending Java exception so later JNI calls on this thread work.
fn clear_exception(env: &mut JNIEnv<'_>, error: jni::errors::Error) -> PushError {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
    map_jni_error(error)
}

/// Load a host class through the activity's class loader.
///
/// `FindClass` on an attached native thread only sees system classes.
fn load_class<'local>(
    env: &mut JNIEnv<'local>,
    context: &JObject<'_>,
    name: &str,
) -> jni::errors::Result<JClass<'local>> {
    let loader = env
        .call_method(context, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])?
        .l()?;
    let jname = env.new_string(name)?;
    let class = env
        .call_method(
            &loader,
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&jname)],
        )?
        .l()?;
    Ok(class.into())
}

fn system_service<'local>(
    env: &mut JNIEnv<'local>,
    context: &JObject<'_>,
    name: &str,
) -> jni::errors::Result<JObject<'local>> {
    let jname = env.new_string(name)?;
    env.call_method(
        context,
        "getSystemService",
        "(Ljava/lang/String;)Ljava/lang/Object;",
        &[JValue::Object(&jname)],
    )?
    .l()
}

fn google_api_availability<'local>(env: &mut JNIEnv<'local>) -> jni::errors::Result<JObject<'local>> {
    env.call_static_method(
        GOOGLE_API_AVAILABILITY,
        "getInstance",
        "()Lcom/google/android/gms/common/GoogleApiAvailability;",
        &[],
    )?
    .l()
}

impl HostContext for AndroidPlatform {
    fn package_name(&self) -> PushResult<String> {
        self.with_env(|env, activity| {
            let name: JString = env
                .call_method(activity, "getPackageName", "()Ljava/lang/String;", &[])?
                .l()?
                .into();
            Ok(env.get_string(&name)?.into())
        })
    }

    fn has_permission(&self, name: &str) -> bool {
        let status = self.with_env(|env, activity| {
            let jname = env.new_string(name)?;
            env.call_method(
                activity,
                "checkSelfPermission",
                "(Ljava/lang/String;)I",
                &[JValue::Object(&jname)],
            )?
            .i()
        });

        match status {
            Ok(status) => status == PERMISSION_GRANTED,
            Err(e) => {
                log::error!("checkSelfPermission({name}) failed: {e}");
                false
            }
        }
    }
}

impl PushServices for AndroidPlatform {
    fn check_availability(&self) -> PushResult<i32> {
        self.with_env(|env, activity| {
            let api = google_api_availability(env)?;
            env.call_method(
                &api,
                "isGooglePlayServicesAvailable",
                "(Landroid/content/Context;)I",
                &[JValue::Object(activity)],
            )?
            .i()
        })
    }

    fn resolve_error_text(&self, code: i32) -> PushResult<String> {
        self.with_env(|env, _activity| {
            let api = google_api_availability(env)?;
            let text: JString = env
                .call_method(
                    &api,
                    "getErrorString",
                    "(I)Ljava/lang/String;",
                    &[JValue::Int(code)],
                )?
                .l()?
                .into();
            if text.is_null() {
                return Ok(String::new());
            }
            Ok(env.get_string(&text)?.into())
        })
    }

    fn initialize(&self, credentials: &PushCredentials) -> PushResult<()> {
        self.with_env(|env, activity| {
            let builder = env.new_object(FIREBASE_OPTIONS_BUILDER, "()V", &[])?;
            let setters = [
                ("setApplicationId", &credentials.application_id),
                ("setGcmSenderId", &credentials.sender_id),
                ("setProjectId", &credentials.project_id),
                ("setApiKey", &credentials.api_key),
            ];
            for (setter, value) in setters {
                let jvalue = env.new_string(value)?;
                env.call_method(
                    &builder,
                    setter,
                    "(Ljava/lang/String;)Lcom/google/firebase/FirebaseOptions$Builder;",
                    &[JValue::Object(&jvalue)],
                )?;
            }
            let options = env
                .call_method(&builder, "build", "()Lcom/google/firebase/FirebaseOptions;", &[])?
                .l()?;

            env.call_static_method(
                FIREBASE_APP,
                "initializeApp",
                "(Landroid/content/Context;Lcom/google/firebase/FirebaseOptions;)Lcom/google/firebase/FirebaseApp;",
                &[JValue::Object(activity), JValue::Object(&options)],
            )?;
            Ok(())
        })
        .map_err(|e| match e {
            PushError::Platform(msg) => PushError::SdkInit(msg),
            other => other,
        })
    }

    fn request_token_refresh(&self) -> PushResult<()> {
        self.with_env(|env, activity| {
            if let Some(class_name) = &self.messaging_service_class {
                let class = load_class(env, activity, class_name)?;
                env.call_static_method(&class, "retrieveToken", "()V", &[])?;
                return Ok(());
            }

            let messaging = env
                .call_static_method(
                    FIREBASE_MESSAGING,
                    "getInstance",
                    "()Lcom/google/firebase/messaging/FirebaseMessaging;",
                    &[],
                )?
                .l()?;
            env.call_method(
                &messaging,
                "getToken",
                "()Lcom/google/android/gms/tasks/Task;",
                &[],
            )?;
            Ok(())
        })
    }
}

impl JobScheduler for AndroidPlatform {
    fn schedule(&self, job: &KeepAliveJob) -> PushResult<()> {
        let period = i64::try_from(job.period_millis).unwrap_or(i64::MAX);
        let result = self.with_env(|env, activity| {
            let service_class = load_class(env, activity, &self.job_service_class)?;
            let component = env.new_object(
                "android/content/ComponentName",
                "(Landroid/content/Context;Ljava/lang/Class;)V",
                &[JValue::Object(activity), JValue::Object(&service_class)],
            )?;

            let builder = env.new_object(
                "android/app/job/JobInfo$Builder",
                "(ILandroid/content/ComponentName;)V",
                &[JValue::Int(job.job_id), JValue::Object(&component)],
            )?;
            env.call_method(
                &builder,
                "setPersisted",
                "(Z)Landroid/app/job/JobInfo$Builder;",
                &[JValue::Bool(u8::from(job.persisted))],
            )?;
            env.call_method(
                &builder,
                "setPeriodic",
                "(J)Landroid/app/job/JobInfo$Builder;",
                &[JValue::Long(period)],
            )?;
            let info = env
                .call_method(&builder, "build", "()Landroid/app/job/JobInfo;", &[])?
                .l()?;

            let scheduler = system_service(env, activity, JOB_SCHEDULER_SERVICE)?;
            env.call_method(
                &scheduler,
                "schedule",
                "(Landroid/app/job/JobInfo;)I",
                &[JValue::Object(&info)],
            )?
            .i()
        })?;

        if result == RESULT_SUCCESS {
            Ok(())
        } else {
            Err(PushError::Platform(format!(
                "JobScheduler rejected job {}",
                job.job_id
            )))
        }
    }
}

impl NotificationService for AndroidPlatform {
    fn cancel_all(&self) -> PushResult<()> {
        self.with_env(|env, activity| {
            let manager = system_service(env, activity, NOTIFICATION_SERVICE)?;
            env.call_method(&manager, "cancelAll", "()V", &[])?;
            Ok(())
        })
    }
}

impl PlatformCapabilities for AndroidPlatform {
    fn supports_persistent_periodic_jobs(&self) -> bool {
        self.sdk_int >= LOLLIPOP
    }

    fn requires_notification_permission(&self) -> bool {
        self.sdk_int >= TIRAMISU
    }
}

static BRIDGE: BridgeSlot<AndroidPlatform, PushNotificationsService> = BridgeSlot::new();
static LAUNCH_PAYLOADS: OnceLock<Receiver<LaunchPayload>> = OnceLock::new();

/// Create the process-wide service for `activity`.
///
/// Once the service exists, later calls rebind it to the new `activity` and
/// keep the first configuration and launch sink.
///
/// # Errors
/// Returns [`PushError::Platform`] if the JVM cannot be reached.
pub fn init(
    env: &mut JNIEnv<'_>,
    activity: &JObject<'_>,
    config: PushConfig,
    launch_sink: Arc<dyn LaunchArgumentSink>,
) -> PushResult<Arc<PushNotificationsService>> {
    bind(env, activity, config, || launch_sink).map(Binding::into_service)
}

/// Rebind the existing service, or create it with the sink from `make_sink`.
fn bind<F>(
    env: &mut JNIEnv<'_>,
    activity: &JObject<'_>,
    config: PushConfig,
    make_sink: F,
) -> PushResult<Binding<PushNotificationsService>>
where
    F: FnOnce() -> Arc<dyn LaunchArgumentSink>,
{
    let binding = BRIDGE.bind(
        env,
        |platform, env| platform.rebind(env, activity),
        |env| {
            let platform = Arc::new(AndroidPlatform::new(env, activity, &config)?);
            let service = Arc::new(PushNotificationsService::new(
                PushPlatform::uniform(platform.clone(), make_sink()),
                config.clone(),
            ));
            Ok((platform, service))
        },
    )?;

    if let Binding::Rebound(service) = &binding {
        if service.config() != &config {
            log::warn!("push service already initialized, ignoring new configuration");
        }
    }
    Ok(binding)
}

/// The service created by [`init`] or by the Java bridge.
#[must_use]
pub fn service() -> Option<Arc<PushNotificationsService>> {
    BRIDGE.service()
}

/// Launch payloads relayed through the Java bridge.
///
/// Only populated when the service was created by `nativeInit`. The queue
/// holds the most recent payloads; older ones are dropped when it is full.
#[must_use]
pub fn launch_payloads() -> Option<Receiver<LaunchPayload>> {
    LAUNCH_PAYLOADS.get().cloned()
}

fn read_string(env: &mut JNIEnv<'_>, value: &JString<'_>) -> Option<String> {
    if value.is_null() {
        return None;
    }
    env.get_string(value).ok().map(Into::into)
}

// JNI exports for the Java `PushNotificationsBridge`

/// `static native void nativeInit(Activity activity, String configJson)`
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_waterkit_push_PushNotificationsBridge_nativeInit<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    activity: JObject<'local>,
    config: JString<'local>,
) {
    let config = match read_string(&mut env, &config) {
        Some(json) if !json.is_empty() => match PushConfig::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e}, using defaults");
                PushConfig::default()
            }
        },
        _ => PushConfig::default(),
    };

    let mut receiver = None;
    let binding = bind(&mut env, &activity, config, || {
        let (sink, payloads) = ChannelLaunchSink::bounded(LAUNCH_QUEUE_CAPACITY);
        receiver = Some(payloads);
        let sink: Arc<dyn LaunchArgumentSink> = Arc::new(sink);
        sink
    });

    match binding {
        Ok(Binding::Created(_)) => {
            if let Some(receiver) = receiver {
                let _ = LAUNCH_PAYLOADS.set(receiver);
            }
        }
        Ok(Binding::Rebound(_)) => log::debug!("push service rebound to new activity"),
        Err(e) => log::error!("push service initialization failed: {e}"),
    }
}

/// `static native void nativeLifecycleEvent(String event)`
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_waterkit_push_PushNotificationsBridge_nativeLifecycleEvent<
    'local,
>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    event: JString<'local>,
) {
    let Some(service) = BRIDGE.service() else {
        return;
    };
    if let Some(event) = read_string(&mut env, &event) {
        service.on_lifecycle_event(&event);
    }
}

/// `static native void nativeSendRuntimeArgs(String value)`
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_waterkit_push_PushNotificationsBridge_nativeSendRuntimeArgs<
    'local,
>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    value: JString<'local>,
) {
    let Some(service) = BRIDGE.service() else {
        log::warn!("launch payload received before nativeInit, dropping");
        return;
    };
    let Some(value) = read_string(&mut env, &value) else {
        return;
    };
    if let Err(e) = service.send_runtime_args(&value) {
        log::warn!("dropping launch payload: {e}");
    }
}
