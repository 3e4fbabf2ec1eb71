//! Win32 notification-area icon.
//!
//! A hidden top-level window receives the tray callback messages.  The
//! [`TrayApp`] holding the toggle controller is boxed and its pointer stored
//! in the window's `GWLP_USERDATA` slot; it is reclaimed and dropped on
//! `WM_DESTROY`, which also removes the icon.
//!
//! - Left click (button up): toggle acceleration.
//! - Right click: context menu with `Exit`.
//! - `TaskbarCreated` (Explorer restarted): add the icon again.
//!
//! # Safety
//!
//! `unsafe` is used only for Win32 FFI.  The window procedure runs on the
//! thread that created the window, so the `TrayApp` pointer is never
//! accessed concurrently.  It can be re-entered, though: writing the pointer
//! settings broadcasts `WM_SETTINGCHANGE` synchronously, and the thread may
//! dispatch a queued tray click before that call returns.  `TrayApp` is
//! therefore only ever borrowed shared, and a click that arrives while a
//! toggle is running is dropped.

#![cfg(target_os = "windows")]

use std::cell::{Cell, RefCell};
use std::ffi::c_void;
use std::rc::Rc;
use std::sync::Arc;

use accel_core::{AccelerationConfiguration, ToggleState};
use thiserror::Error;
use tracing::{debug, info, warn};
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, POINT, TRUE, WPARAM};
use windows::Win32::Graphics::Gdi::{CreateBitmap, DeleteObject};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Shell::{
    Shell_NotifyIconW, NIF_ICON, NIF_INFO, NIF_MESSAGE, NIF_TIP, NIIF_ERROR, NIM_ADD,
    NIM_DELETE, NIM_MODIFY, NOTIFYICONDATAW, NOTIFYICONDATAW_0,
};
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreateIconIndirect, CreatePopupMenu, CreateWindowExW, DefWindowProcW,
    DestroyIcon, DestroyMenu, DestroyWindow, DispatchMessageW, GetCursorPos, GetMessageW,
    GetWindowLongPtrW, PostQuitMessage, RegisterClassW, RegisterWindowMessageW,
    SetForegroundWindow, SetWindowLongPtrW,
    TrackPopupMenu, TranslateMessage, GWLP_USERDATA, HICON, HMENU, ICONINFO, MF_STRING, MSG,
    TPM_BOTTOMALIGN, TPM_RIGHTBUTTON, WINDOW_EX_STYLE, WINDOW_STYLE, WM_APP, WM_COMMAND,
    WM_CONTEXTMENU, WM_DESTROY, WM_LBUTTONUP, WM_RBUTTONUP, WNDCLASSW,
};

use super::icon::{render_icon, ICON_SIZE};
use super::APP_TITLE;
use crate::application::settings_store::{PointerSettingsApi, SettingsError, SettingsStore};
use crate::application::toggle::{StatusIndicator, ToggleController};
use crate::infrastructure::storage::config::AppConfig;

/// Callback message the shell posts for tray icon mouse events.
const WM_TRAY_CALLBACK: u32 = WM_APP + 1;
const TRAY_ICON_ID: u32 = 1;
const MENU_EXIT_ID: usize = 1001;
const CLASS_NAME: PCWSTR = w!("MouseAccelerationTrayWindow");

/// Error type for tray start-up.
#[derive(Debug, Error)]
pub enum TrayError {
    #[error("failed to get module handle: {0}")]
    ModuleHandle(#[source] windows::core::Error),
    #[error("failed to register window class: {0}")]
    RegisterClass(#[source] windows::core::Error),
    #[error("failed to create tray window: {0}")]
    CreateWindow(#[source] windows::core::Error),
    #[error("failed to create tray icon image: {0}")]
    CreateIcon(#[source] windows::core::Error),
    #[error("the shell refused to add the tray icon")]
    AddIcon,
}

// ── Icons ─────────────────────────────────────────────────────────────────────

/// One `HICON` per toggle state, destroyed on drop.
struct IconSet {
    enabled: HICON,
    disabled: HICON,
}

impl IconSet {
    fn create() -> Result<Self, TrayError> {
        let enabled = create_hicon(ToggleState::Enabled).map_err(TrayError::CreateIcon)?;
        let disabled = match create_hicon(ToggleState::Disabled) {
            Ok(icon) => icon,
            Err(e) => {
                // SAFETY: `enabled` was created above and is not shared yet.
                unsafe { DestroyIcon(enabled).ok() };
                return Err(TrayError::CreateIcon(e));
            }
        };
        Ok(Self { enabled, disabled })
    }

    fn for_state(&self, state: ToggleState) -> HICON {
        match state {
            ToggleState::Enabled => self.enabled,
            ToggleState::Disabled => self.disabled,
        }
    }
}

impl Drop for IconSet {
    fn drop(&mut self) {
        // SAFETY: both handles were created by CreateIconIndirect and are
        // no longer referenced by the tray once the indicator is dropped.
        unsafe {
            DestroyIcon(self.enabled).ok();
            DestroyIcon(self.disabled).ok();
        }
    }
}

fn create_hicon(state: ToggleState) -> windows::core::Result<HICON> {
    let bgra = render_icon(state).to_bgra();
    // The colour bitmap carries per-pixel alpha, so the AND mask is all zero.
    let mask_bits = vec![0u8; ICON_SIZE * ICON_SIZE / 8];
    let size = ICON_SIZE as i32;

    // SAFETY: both buffers are large enough for a 32×32 bitmap of the given
    // bit depth and outlive the CreateBitmap calls; GDI copies the bits.
    unsafe {
        let color = CreateBitmap(size, size, 1, 32, Some(bgra.as_ptr() as *const c_void));
        let mask = CreateBitmap(size, size, 1, 1, Some(mask_bits.as_ptr() as *const c_void));
        let info = ICONINFO {
            fIcon: TRUE,
            xHotspot: 0,
            yHotspot: 0,
            hbmMask: mask,
            hbmColor: color,
        };
        let icon = CreateIconIndirect(&info);
        // CreateIconIndirect copies the bitmaps.
        let _ = DeleteObject(color);
        let _ = DeleteObject(mask);
        icon
    }
}

// ── Indicator ─────────────────────────────────────────────────────────────────

/// [`StatusIndicator`] backed by a `Shell_NotifyIconW` icon.
pub struct TrayIndicator {
    hwnd: HWND,
    icons: IconSet,
    notification_timeout_ms: u32,
    /// Last state passed to `render`; `None` until the controller renders.
    shown: Cell<Option<ToggleState>>,
}

impl TrayIndicator {
    /// Adds the icon to the notification area.
    fn install(hwnd: HWND, notification_timeout_ms: u32) -> Result<Self, TrayError> {
        let indicator = Self {
            hwnd,
            icons: IconSet::create()?,
            notification_timeout_ms,
            shown: Cell::new(None),
        };
        if !indicator.add() {
            return Err(TrayError::AddIcon);
        }
        debug!("tray icon added");
        Ok(indicator)
    }

    /// Adds the icon again after Explorer has restarted, showing the last
    /// rendered state.  Returns `false` if the shell refused.
    fn reinstall(&self) -> bool {
        let added = self.add();
        if added {
            info!("tray icon restored after taskbar restart");
        } else {
            warn!("failed to restore tray icon after taskbar restart");
        }
        added
    }

    fn add(&self) -> bool {
        let shown = self.shown.get();
        let mut nid = notify_data(self.hwnd);
        nid.uFlags = NIF_ICON | NIF_MESSAGE | NIF_TIP;
        nid.uCallbackMessage = WM_TRAY_CALLBACK;
        nid.hIcon = self.icons.for_state(shown.unwrap_or(ToggleState::Disabled));
        copy_wide(&mut nid.szTip, tooltip(shown));

        // SAFETY: `nid` is fully initialised and `hwnd` is a live window.
        unsafe { Shell_NotifyIconW(NIM_ADD, &nid) }.as_bool()
    }
}

/// Tooltip for the icon; the application title until a state is known.
fn tooltip(shown: Option<ToggleState>) -> &'static str {
    shown.map_or(APP_TITLE, ToggleState::status_text)
}

impl StatusIndicator for TrayIndicator {
    fn render(&self, state: ToggleState) {
        self.shown.set(Some(state));
        let mut nid = notify_data(self.hwnd);
        nid.uFlags = NIF_ICON | NIF_TIP;
        nid.hIcon = self.icons.for_state(state);
        copy_wide(&mut nid.szTip, state.status_text());

        // SAFETY: `nid` refers to the icon added in `add`.
        if !unsafe { Shell_NotifyIconW(NIM_MODIFY, &nid) }.as_bool() {
            warn!("failed to update tray icon to {state:?}");
        }
    }

    fn notify_failure(&self, title: &str, message: &str) {
        let mut nid = notify_data(self.hwnd);
        nid.uFlags = NIF_INFO;
        nid.dwInfoFlags = NIIF_ERROR;
        nid.Anonymous = NOTIFYICONDATAW_0 {
            uTimeout: self.notification_timeout_ms,
        };
        copy_wide(&mut nid.szInfoTitle, title);
        copy_wide(&mut nid.szInfo, message);

        // SAFETY: as in `render`.
        if !unsafe { Shell_NotifyIconW(NIM_MODIFY, &nid) }.as_bool() {
            warn!("failed to show failure notification: {message}");
        }
    }
}

impl Drop for TrayIndicator {
    fn drop(&mut self) {
        let nid = notify_data(self.hwnd);
        // SAFETY: removing an icon that may already be gone is harmless.
        let _ = unsafe { Shell_NotifyIconW(NIM_DELETE, &nid) };
        debug!("tray icon removed");
    }
}

fn notify_data(hwnd: HWND) -> NOTIFYICONDATAW {
    NOTIFYICONDATAW {
        cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
        hWnd: hwnd,
        uID: TRAY_ICON_ID,
        ..Default::default()
    }
}

/// Copies `text` into a fixed-size, NUL-terminated UTF-16 field, truncating
/// if necessary.
fn copy_wide(dst: &mut [u16], text: &str) {
    let Some(capacity) = dst.len().checked_sub(1) else {
        return;
    };
    let mut len = 0;
    for (slot, unit) in dst.iter_mut().zip(text.encode_utf16().take(capacity)) {
        *slot = unit;
        len += 1;
    }
    dst[len] = 0;
}

// ── Window and message loop ───────────────────────────────────────────────────

/// State reachable from the window procedure.
struct TrayApp {
    controller: RefCell<ToggleController>,
    indicator: Rc<TrayIndicator>,
    /// Registered id of the `TaskbarCreated` broadcast; 0 if unavailable.
    taskbar_created: u32,
}

/// What the window procedure does with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrayAction {
    Toggle,
    ShowMenu,
    Exit,
    ReinstallIcon,
    Destroy,
    /// Handled message with nothing to do.
    Ignore,
    /// Not ours; pass to `DefWindowProcW`.
    Default,
}

/// Maps the mouse message carried by a tray callback to an action.
fn callback_action(mouse_msg: u32) -> TrayAction {
    match mouse_msg {
        WM_LBUTTONUP => TrayAction::Toggle,
        WM_RBUTTONUP | WM_CONTEXTMENU => TrayAction::ShowMenu,
        _ => TrayAction::Ignore,
    }
}

/// Maps a window message to an action.
fn message_action(msg: u32, wparam: WPARAM, lparam: LPARAM, taskbar_created: u32) -> TrayAction {
    match msg {
        // The low word of lParam carries the mouse message.
        WM_TRAY_CALLBACK => callback_action((lparam.0 as u32) & 0xFFFF),
        WM_COMMAND if (wparam.0 & 0xFFFF) == MENU_EXIT_ID => TrayAction::Exit,
        WM_DESTROY => TrayAction::Destroy,
        m if taskbar_created != 0 && m == taskbar_created => TrayAction::ReinstallIcon,
        _ => TrayAction::Default,
    }
}

/// Runs one toggle, or returns `None` if a toggle is already in progress
/// further up the stack.
fn toggle_unless_busy(
    controller: &RefCell<ToggleController>,
) -> Option<Result<ToggleState, SettingsError>> {
    let Ok(mut controller) = controller.try_borrow_mut() else {
        debug!("toggle already in progress; click ignored");
        return None;
    };
    Some(controller.toggle())
}

/// Creates the tray icon and runs the Win32 message loop until `Exit`.
///
/// # Errors
///
/// Returns [`TrayError`] if the window or the tray icon cannot be created.
pub fn run_tray(config: &AppConfig, api: Arc<dyn PointerSettingsApi>) -> Result<(), TrayError> {
    // SAFETY: querying the handle of the running executable.
    let hinstance: HINSTANCE = unsafe { GetModuleHandleW(None) }
        .map_err(TrayError::ModuleHandle)?
        .into();

    let class = WNDCLASSW {
        lpfnWndProc: Some(window_proc),
        hInstance: hinstance,
        lpszClassName: CLASS_NAME,
        ..Default::default()
    };
    // SAFETY: `class` is valid and CLASS_NAME is a static wide string.
    if unsafe { RegisterClassW(&class) } == 0 {
        return Err(TrayError::RegisterClass(windows::core::Error::from_win32()));
    }

    // SAFETY: the class was registered above.  The window is never shown;
    // it only exists to receive tray callbacks.
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            CLASS_NAME,
            w!("Mouse Acceleration Toggle"),
            WINDOW_STYLE::default(),
            0,
            0,
            0,
            0,
            HWND::default(),
            HMENU::default(),
            hinstance,
            None,
        )
    }
    .map_err(TrayError::CreateWindow)?;

    // SAFETY: registering a message name with a static wide string.
    let taskbar_created = unsafe { RegisterWindowMessageW(w!("TaskbarCreated")) };
    if taskbar_created == 0 {
        warn!("TaskbarCreated is unavailable; the icon will not survive an Explorer restart");
    }

    let indicator = match TrayIndicator::install(hwnd, config.tray.notification_timeout_ms) {
        Ok(indicator) => Rc::new(indicator),
        Err(e) => {
            // SAFETY: `hwnd` was created above and has no user data yet.
            unsafe { DestroyWindow(hwnd).ok() };
            return Err(e);
        }
    };

    let store = SettingsStore::new(api, AccelerationConfiguration::DEFAULT);
    let controller = ToggleController::new(store, Box::new(Rc::clone(&indicator)));
    let app = Box::new(TrayApp {
        controller: RefCell::new(controller),
        indicator,
        taskbar_created,
    });

    // SAFETY: ownership of the box moves to the window; WM_DESTROY takes it back.
    unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, Box::into_raw(app) as isize) };
    info!("tray ready; left-click the icon to toggle mouse acceleration");

    let mut msg = MSG::default();
    // SAFETY: standard Win32 GetMessage/DispatchMessage loop on the window's thread.
    unsafe {
        while GetMessageW(&mut msg, HWND::default(), 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
    Ok(())
}

/// Returns the `TrayApp` attached to `hwnd`, if any.
///
/// # Safety
///
/// Must be called on the window's thread, and the reference must not be
/// held across `WM_DESTROY`.
unsafe fn tray_app<'a>(hwnd: HWND) -> Option<&'a TrayApp> {
    (GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *const TrayApp).as_ref()
}

/// Window procedure for the hidden tray window.
///
/// # Safety
///
/// Called by Windows on the thread that created the window.
unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let taskbar_created = tray_app(hwnd).map_or(0, |app| app.taskbar_created);

    match message_action(msg, wparam, lparam, taskbar_created) {
        TrayAction::Toggle => {
            let result = tray_app(hwnd).and_then(|app| toggle_unless_busy(&app.controller));
            if let Some(Ok(state)) = result {
                debug!("toggled to {state:?}");
            }
        }
        TrayAction::ShowMenu => show_context_menu(hwnd),
        TrayAction::Exit => {
            info!("exit requested from tray menu");
            DestroyWindow(hwnd).ok();
        }
        TrayAction::ReinstallIcon => {
            if let Some(app) = tray_app(hwnd) {
                app.indicator.reinstall();
            }
        }
        TrayAction::Destroy => {
            let ptr = SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) as *mut TrayApp;
            if !ptr.is_null() {
                // SAFETY: `ptr` came from Box::into_raw in `run_tray`, and
                // the slot has just been cleared so it cannot be reused.
                drop(Box::from_raw(ptr));
            }
            PostQuitMessage(0);
        }
        TrayAction::Ignore => {}
        TrayAction::Default => return DefWindowProcW(hwnd, msg, wparam, lparam),
    }
    LRESULT(0)
}

/// Shows the tray context menu at the cursor.
///
/// # Safety
///
/// `hwnd` must be the live tray window.
unsafe fn show_context_menu(hwnd: HWND) {
    let Ok(menu) = CreatePopupMenu() else {
        warn!("failed to create tray context menu");
        return;
    };

    if AppendMenuW(menu, MF_STRING, MENU_EXIT_ID, w!("Exit")).is_ok() {
        let mut cursor = POINT::default();
        if GetCursorPos(&mut cursor).is_ok() {
            // Required so the menu closes when the user clicks elsewhere.
            let _ = SetForegroundWindow(hwnd);
            let _ = TrackPopupMenu(
                menu,
                TPM_RIGHTBUTTON | TPM_BOTTOMALIGN,
                cursor.x,
                cursor.y,
                0,
                hwnd,
                None,
            );
        }
    }
    DestroyMenu(menu).ok();
}
