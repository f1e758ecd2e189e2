//! Browser camera and hand detector glue
//!
//! The detector is the MediaPipe Hands script loaded by the page. Results come
//! back as a JSON string (first hand's keypoints, or `null`) so the Rust side
//! only deals with [`crate::gesture::parse_detector_result`].

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlVideoElement, MediaStream, MediaStreamConstraints, MediaStreamTrack, Window};

use super::{CameraError, FrameSource, FrameSourceKind, VideoFrameGate};

#[wasm_bindgen(inline_js = "
    export function detector_available() {
        return typeof window.Hands === 'function';
    }

    export function camera_helper_available() {
        return typeof window.Camera === 'function';
    }

    export function media_devices_available() {
        return !!(navigator.mediaDevices && navigator.mediaDevices.getUserMedia);
    }

    export function create_hands(on_result) {
        const hands = new window.Hands({
            locateFile: (file) => `https://cdn.jsdelivr.net/npm/@mediapipe/hands@0.4/${file}`,
        });
        hands.setOptions({
            maxNumHands: 1,
            modelComplexity: 0,
            minDetectionConfidence: 0.5,
            minTrackingConfidence: 0.5,
        });
        hands.onResults((results) => {
            const marks = results.multiHandLandmarks;
            on_result(JSON.stringify(marks && marks.length > 0 ? marks[0] : null));
        });
        return hands;
    }

    export function send_frame(hands, video) {
        return hands.send({ image: video });
    }

    export function start_camera_helper(hands, video) {
        const camera = new window.Camera(video, {
            onFrame: async () => {
                await hands.send({ image: video });
            },
            width: 640,
            height: 480,
        });
        camera.start();
        return camera;
    }

    export function stop_camera_helper(camera) {
        if (camera && typeof camera.stop === 'function') {
            camera.stop();
        }
    }

    export function next_frame() {
        return new Promise((resolve) => requestAnimationFrame(resolve));
    }
")]
extern "C" {
    pub fn detector_available() -> bool;
    pub fn camera_helper_available() -> bool;
    fn media_devices_available() -> bool;
    fn create_hands(on_result: &Closure<dyn FnMut(String)>) -> JsValue;
    fn send_frame(hands: &JsValue, video: &HtmlVideoElement) -> js_sys::Promise;
    fn start_camera_helper(hands: &JsValue, video: &HtmlVideoElement) -> JsValue;
    fn stop_camera_helper(camera: &JsValue);
    fn next_frame() -> js_sys::Promise;
}

/// `DOMException.name` of a rejected camera request
fn error_name(err: &JsValue) -> String {
    js_sys::Reflect::get(err, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn blocked(err: JsValue) -> CameraError {
    let name = error_name(&err);
    log::warn!("Camera request failed: {} ({:?})", name, err);
    CameraError::Blocked(name)
}

/// Ask for the camera and start the preview video
///
/// Checks run in order: detector script, media devices, secure context.
pub async fn acquire_camera(
    window: &Window,
    video: &HtmlVideoElement,
) -> Result<MediaStream, CameraError> {
    if !detector_available() {
        return Err(CameraError::DetectorUnavailable);
    }
    if !media_devices_available() {
        return Err(CameraError::Unsupported);
    }
    if !window.is_secure_context() {
        return Err(CameraError::InsecureContext);
    }

    let devices = window
        .navigator()
        .media_devices()
        .map_err(|_| CameraError::Unsupported)?;
    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);
    constraints.set_audio(&JsValue::FALSE);

    let request = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(blocked)?;
    let stream: MediaStream = JsFuture::from(request)
        .await
        .map_err(blocked)?
        .dyn_into()
        .map_err(blocked)?;

    video.set_src_object(Some(&stream));
    let played = match video.play() {
        Ok(play) => JsFuture::from(play).await.map(drop),
        Err(e) => Err(e),
    };
    if let Err(e) = played {
        release_camera(&stream);
        video.set_src_object(None);
        return Err(blocked(e));
    }

    log::info!("Camera stream started");
    Ok(stream)
}

/// Stop every track of a camera stream
pub fn release_camera(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

/// A running camera: the stream plus the source feeding its frames to the detector
///
/// Dropping the session stops the frames and releases the camera.
pub struct CameraSession {
    frames: Box<dyn FrameSource>,
    stream: MediaStream,
    video: HtmlVideoElement,
}

impl CameraSession {
    pub fn new(frames: Box<dyn FrameSource>, stream: MediaStream, video: HtmlVideoElement) -> Self {
        Self {
            frames,
            stream,
            video,
        }
    }

    pub fn kind(&self) -> FrameSourceKind {
        self.frames.kind()
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.frames.stop();
        release_camera(&self.stream);
        self.video.set_src_object(None);
        log::info!("Camera released");
    }
}

/// Handle to the page's hand detector
#[derive(Clone)]
pub struct HandDetector {
    hands: JsValue,
}

impl HandDetector {
    /// Create the detector; `on_result` receives each JSON payload
    pub fn new(mut on_result: impl FnMut(String) + 'static) -> Self {
        let closure = Closure::<dyn FnMut(String)>::new(move |json: String| on_result(json));
        let hands = create_hands(&closure);
        // Lives as long as the detector, which lives as long as the page
        closure.forget();
        Self { hands }
    }

    /// Pick the frame source the page supports
    pub fn frame_source(&self, video: HtmlVideoElement) -> Box<dyn FrameSource> {
        match FrameSourceKind::select(camera_helper_available()) {
            FrameSourceKind::CameraHelper => Box::new(CameraHelperSource::new(self.clone(), video)),
            FrameSourceKind::ManualPoll => Box::new(ManualPollSource::new(self.clone(), video)),
        }
    }
}

/// Frames driven by MediaPipe's `Camera` helper
pub struct CameraHelperSource {
    detector: HandDetector,
    video: HtmlVideoElement,
    camera: Option<JsValue>,
}

impl CameraHelperSource {
    pub fn new(detector: HandDetector, video: HtmlVideoElement) -> Self {
        Self {
            detector,
            video,
            camera: None,
        }
    }
}

impl FrameSource for CameraHelperSource {
    fn kind(&self) -> FrameSourceKind {
        FrameSourceKind::CameraHelper
    }

    fn start(&mut self) {
        if self.camera.is_none() {
            self.camera = Some(start_camera_helper(&self.detector.hands, &self.video));
        }
    }

    fn stop(&mut self) {
        if let Some(camera) = self.camera.take() {
            stop_camera_helper(&camera);
        }
    }

    fn is_running(&self) -> bool {
        self.camera.is_some()
    }
}

impl Drop for CameraHelperSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Polls the video element once per animation frame
///
/// Only frames whose media clock advanced are sent, and the next poll waits
/// for the detector to finish the current one.
pub struct ManualPollSource {
    detector: HandDetector,
    video: HtmlVideoElement,
    running: Rc<Cell<bool>>,
}

impl ManualPollSource {
    pub fn new(detector: HandDetector, video: HtmlVideoElement) -> Self {
        Self {
            detector,
            video,
            running: Rc::new(Cell::new(false)),
        }
    }
}

impl FrameSource for ManualPollSource {
    fn kind(&self) -> FrameSourceKind {
        FrameSourceKind::ManualPoll
    }

    fn start(&mut self) {
        if self.running.replace(true) {
            return;
        }

        let running = self.running.clone();
        let hands = self.detector.hands.clone();
        let video = self.video.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let mut gate = VideoFrameGate::default();
            while running.get() {
                if gate.admit(video.ready_state(), video.current_time())
                    && let Err(e) = JsFuture::from(send_frame(&hands, &video)).await
                {
                    log::warn!("Detector rejected frame: {:?}", e);
                }
                if JsFuture::from(next_frame()).await.is_err() {
                    break;
                }
            }
        });
    }

    fn stop(&mut self) {
        self.running.set(false);
    }

    fn is_running(&self) -> bool {
        self.running.get()
    }
}

impl Drop for ManualPollSource {
    fn drop(&mut self) {
        self.stop();
    }
}
