//! The overlay window.
//!
//! A borderless, topmost tool window with a toolbar (sector picker, mode
//! buttons, clear, minimize, close) above the map. The window procedure
//! only records input as [`UiEvent`]s; the main loop drains them with
//! [`OverlayWindow::take_events`] and paints whatever [`OverlayView`] it
//! was last given.

use super::image::DecodedImage;
use crate::app::UiEvent;
use crate::calculator::{ImageLayout, InteractionMode, KeyInput, OverlayView, ScreenPoint};
use crate::catalog::MapCatalog;
use crate::shell::{fit_image, WindowBounds, WorkArea, TOOLBAR_HEIGHT};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::c_void;
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, CreatePen, CreateSolidBrush,
    DeleteDC, DeleteObject, DrawTextW, Ellipse, EndPaint, FillRect, InvalidateRect, LineTo,
    MoveToEx, ScreenToClient, SelectObject, SetBkMode, SetStretchBltMode, SetTextColor,
    StretchDIBits, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, DRAW_TEXT_FORMAT,
    DT_CENTER, DT_LEFT, DT_SINGLELINE, DT_VCENTER, DT_WORDBREAK, HALFTONE, HDC, PAINTSTRUCT,
    PS_SOLID, SRCCOPY, TRANSPARENT,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{GetKeyState, SetFocus, VK_CONTROL, VK_ESCAPE};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, GetClientRect, GetWindowLongPtrW,
    GetWindowRect, IsIconic, IsWindowVisible, KillTimer, LoadCursorW, MoveWindow, RegisterClassW,
    SendMessageW, SetForegroundWindow, SetLayeredWindowAttributes, SetTimer, SetWindowLongPtrW,
    SetWindowPos, ShowWindow, SystemParametersInfoW, BS_PUSHBUTTON, CBN_SELCHANGE,
    CBS_DROPDOWNLIST, CB_ADDSTRING, CB_GETCURSEL, CB_SETCURSEL, CREATESTRUCTW, GWLP_USERDATA,
    HMENU, HTCAPTION, HTCLIENT, HWND_TOPMOST, IDC_CROSS, LWA_ALPHA, MINMAXINFO, SIZE_MINIMIZED,
    SPI_GETWORKAREA, SWP_NOMOVE, SWP_NOSIZE, SW_HIDE, SW_MINIMIZE, SW_SHOW,
    SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS, WA_INACTIVE, WINDOW_STYLE, WM_ACTIVATE, WM_CLOSE,
    WM_COMMAND, WM_ERASEBKGND, WM_EXITSIZEMOVE, WM_GETMINMAXINFO, WM_KEYDOWN, WM_LBUTTONDOWN,
    WM_NCCREATE, WM_NCDESTROY, WM_NCHITTEST, WM_PAINT, WM_SIZE, WM_TIMER, WNDCLASSW, WS_CHILD,
    WS_CLIPCHILDREN, WS_EX_LAYERED, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_POPUP, WS_TABSTOP,
    WS_THICKFRAME, WS_VISIBLE, WS_VSCROLL,
};

const CLASS_NAME: PCWSTR = w!("FoxholeOverlayWindow");

const ID_MAP_SELECT: u16 = 100;
const ID_ARTILLERY: u16 = 101;
const ID_TARGET: u16 = 102;
const ID_CLEAR: u16 = 103;
const ID_MINIMIZE: u16 = 104;
const ID_CLOSE: u16 = 105;

/// Window opacity, 0-255.
const OPACITY: u8 = 235;

const BACKGROUND: COLORREF = COLORREF(0x0020_2020);
const TOOLBAR: COLORREF = COLORREF(0x0030_3030);
const TEXT: COLORREF = COLORREF(0x00E0_E0E0);
// COLORREF is 0x00BBGGRR
const ARTILLERY_COLOR: COLORREF = COLORREF(0x0035_43E7);
const TARGET_COLOR: COLORREF = COLORREF(0x00DB_9834);
const LINE_COLOR: COLORREF = COLORREF(0x0000_D7FF);

const MARKER_RADIUS: i32 = 8;
const PICKER_WIDTH: i32 = 220;
const BUTTON_WIDTH: i32 = 96;
const SMALL_BUTTON_WIDTH: i32 = 32;
const CONTROL_HEIGHT: i32 = 28;
const GAP: i32 = 6;

/// Smallest window the toolbar and a usable map area fit into.
const MIN_WIDTH: i32 = 720;
const MIN_HEIGHT: i32 = TOOLBAR_HEIGHT + 240;

const REFOCUS_TIMER_ID: usize = 1;
/// Delay before taking focus back after the overlay is deactivated.
const REFOCUS_DELAY_MS: u32 = 100;

/// What the window procedure shares with the main thread.
struct WindowState {
    view: OverlayView,
    image: Option<DecodedImage>,
    layout: Option<ImageLayout>,
    events: VecDeque<UiEvent>,
    controls: Vec<(u16, HWND)>,
}

pub struct OverlayWindow {
    hwnd: HWND,
    picker: HWND,
    catalog: &'static MapCatalog,
    // Boxed so the pointer stored in GWLP_USERDATA stays put
    state: Box<RefCell<WindowState>>,
}

impl OverlayWindow {
    /// Creates the window hidden at `bounds`.
    pub fn create(
        bounds: WindowBounds,
        catalog: &'static MapCatalog,
    ) -> windows::core::Result<Self> {
        let state = Box::new(RefCell::new(WindowState {
            view: OverlayView::default(),
            image: None,
            layout: None,
            events: VecDeque::new(),
            controls: Vec::new(),
        }));

        unsafe {
            let instance: HINSTANCE = GetModuleHandleW(None)?.into();
            register_class(instance)?;

            let hwnd = CreateWindowExW(
                WS_EX_LAYERED | WS_EX_TOPMOST | WS_EX_TOOLWINDOW,
                CLASS_NAME,
                w!("Foxhole Artillery Calculator"),
                WS_POPUP | WS_THICKFRAME | WS_CLIPCHILDREN,
                bounds.x,
                bounds.y,
                bounds.width,
                bounds.height,
                None,
                None,
                instance,
                Some(&*state as *const RefCell<WindowState> as *const c_void),
            )?;
            SetLayeredWindowAttributes(hwnd, COLORREF(0), OPACITY, LWA_ALPHA)?;

            let picker = create_control(
                hwnd,
                w!("COMBOBOX"),
                w!(""),
                WINDOW_STYLE(CBS_DROPDOWNLIST as u32) | WS_VSCROLL,
                ID_MAP_SELECT,
            )?;
            for entry in catalog.entries() {
                let label: Vec<u16> = entry.display_name.encode_utf16().chain(Some(0)).collect();
                SendMessageW(picker, CB_ADDSTRING, WPARAM(0), LPARAM(label.as_ptr() as isize));
            }

            let buttons = [
                (ID_ARTILLERY, w!("Artillery (1)")),
                (ID_TARGET, w!("Target (2)")),
                (ID_CLEAR, w!("Clear (C)")),
                (ID_MINIMIZE, w!("_")),
                (ID_CLOSE, w!("X")),
            ];
            let mut controls = vec![(ID_MAP_SELECT, picker)];
            for (id, label) in buttons {
                let style = WINDOW_STYLE(BS_PUSHBUTTON as u32);
                let button = create_control(hwnd, w!("BUTTON"), label, style, id)?;
                controls.push((id, button));
            }
            layout_toolbar(&controls, client_size(hwnd).0);
            state.borrow_mut().controls = controls;

            tracing::info!(?bounds, "Overlay window created");
            Ok(Self {
                hwnd,
                picker,
                catalog,
                state,
            })
        }
    }

    pub fn show(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_SHOW);
            bring_to_front(self.hwnd);
        }
    }

    pub fn hide(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_HIDE);
        }
    }

    pub fn minimize(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_MINIMIZE);
        }
    }

    /// Input queued by the window procedure since the last call.
    pub fn take_events(&self) -> Vec<UiEvent> {
        self.state.borrow_mut().events.drain(..).collect()
    }

    /// Replaces the painted view and syncs the sector picker.
    pub fn set_view(&self, view: OverlayView) {
        let index = view
            .selected_map
            .as_deref()
            .and_then(|id| self.catalog.position(id));
        self.state.borrow_mut().view = view;

        unsafe {
            let current = SendMessageW(self.picker, CB_GETCURSEL, WPARAM(0), LPARAM(0)).0;
            let wanted = index.map_or(-1, |i| i as isize);
            if current != wanted {
                SendMessageW(self.picker, CB_SETCURSEL, WPARAM(wanted as usize), LPARAM(0));
            }
            let _ = InvalidateRect(self.hwnd, None, false);
        }
    }

    /// Installs a decoded map image and returns where it is drawn.
    pub fn set_image(&self, image: DecodedImage) -> ImageLayout {
        let (width, height) = client_size(self.hwnd);
        let layout = fit_image(width, height, image.width, image.height);

        let mut state = self.state.borrow_mut();
        state.image = Some(image);
        state.layout = Some(layout);
        layout
    }

    /// Drops the current image, e.g. after a failed load.
    pub fn clear_image(&self) {
        let mut state = self.state.borrow_mut();
        state.image = None;
        state.layout = None;
    }
}

impl Drop for OverlayWindow {
    fn drop(&mut self) {
        unsafe {
            if let Err(e) = DestroyWindow(self.hwnd) {
                tracing::warn!(?e, "Failed to destroy overlay window");
            }
        }
        tracing::info!("Overlay window closed");
    }
}

/// Usable area of the primary display.
pub fn work_area() -> WorkArea {
    let mut rect = RECT::default();
    let result = unsafe {
        SystemParametersInfoW(
            SPI_GETWORKAREA,
            0,
            Some(&mut rect as *mut RECT as *mut c_void),
            SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
        )
    };
    if let Err(e) = result {
        tracing::warn!(?e, "Failed to query work area, assuming 1920x1080");
        return WorkArea {
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
        };
    }

    WorkArea {
        x: rect.left,
        y: rect.top,
        width: rect.right - rect.left,
        height: rect.bottom - rect.top,
    }
}

unsafe fn register_class(instance: HINSTANCE) -> windows::core::Result<()> {
    let class = WNDCLASSW {
        lpfnWndProc: Some(wndproc),
        hInstance: instance,
        lpszClassName: CLASS_NAME,
        hCursor: LoadCursorW(None, IDC_CROSS)?,
        ..Default::default()
    };
    // Zero means failure or an existing class from an earlier window
    if RegisterClassW(&class) == 0 {
        tracing::debug!("Overlay window class already registered");
    }
    Ok(())
}

unsafe fn create_control(
    parent: HWND,
    class: PCWSTR,
    text: PCWSTR,
    style: WINDOW_STYLE,
    id: u16,
) -> windows::core::Result<HWND> {
    CreateWindowExW(
        Default::default(),
        class,
        text,
        WS_CHILD | WS_VISIBLE | WS_TABSTOP | style,
        0,
        0,
        0,
        0,
        parent,
        HMENU(usize::from(id) as *mut c_void),
        None,
        None,
    )
}

/// Positions the toolbar controls for a client area `width` pixels wide.
fn layout_toolbar(controls: &[(u16, HWND)], width: i32) {
    let top = (TOOLBAR_HEIGHT - CONTROL_HEIGHT) / 2;
    let mut x = GAP;
    let place = |id: u16, left: i32, w: i32, h: i32| {
        if let Some((_, control)) = controls.iter().find(|(control_id, _)| *control_id == id) {
            unsafe {
                let _ = MoveWindow(*control, left, top, w, h, true);
            }
        }
    };

    // The dropdown height includes the open list
    place(ID_MAP_SELECT, x, PICKER_WIDTH, 400);
    x += PICKER_WIDTH + GAP;
    for id in [ID_ARTILLERY, ID_TARGET, ID_CLEAR] {
        place(id, x, BUTTON_WIDTH, CONTROL_HEIGHT);
        x += BUTTON_WIDTH + GAP;
    }

    let close_x = width - GAP - SMALL_BUTTON_WIDTH;
    place(ID_CLOSE, close_x, SMALL_BUTTON_WIDTH, CONTROL_HEIGHT);
    place(ID_MINIMIZE, close_x - GAP - SMALL_BUTTON_WIDTH, SMALL_BUTTON_WIDTH, CONTROL_HEIGHT);
}

unsafe fn bring_to_front(hwnd: HWND) {
    let _ = SetWindowPos(hwnd, HWND_TOPMOST, 0, 0, 0, 0, SWP_NOMOVE | SWP_NOSIZE);
    let _ = SetForegroundWindow(hwnd);
    let _ = SetFocus(hwnd);
}

fn client_size(hwnd: HWND) -> (i32, i32) {
    let mut rect = RECT::default();
    unsafe {
        let _ = GetClientRect(hwnd, &mut rect);
    }
    (rect.right - rect.left, rect.bottom - rect.top)
}

fn window_bounds(hwnd: HWND) -> WindowBounds {
    let mut rect = RECT::default();
    unsafe {
        let _ = GetWindowRect(hwnd, &mut rect);
    }
    WindowBounds {
        x: rect.left,
        y: rect.top,
        width: rect.right - rect.left,
        height: rect.bottom - rect.top,
    }
}

fn loword(value: usize) -> u16 {
    (value & 0xffff) as u16
}

fn hiword(value: usize) -> u16 {
    ((value >> 16) & 0xffff) as u16
}

/// Signed coordinates packed into an `LPARAM`.
fn point_from_lparam(lparam: LPARAM) -> (i32, i32) {
    let value = lparam.0 as usize;
    (
        i32::from(loword(value) as i16),
        i32::from(hiword(value) as i16),
    )
}

/// Whether a `WM_ACTIVATE` means the window lost activation.
fn lost_activation(wparam: WPARAM) -> bool {
    u32::from(loword(wparam.0)) == WA_INACTIVE
}

fn key_input(vk: u16) -> KeyInput {
    match vk {
        _ if vk == VK_ESCAPE.0 => KeyInput::Escape,
        // Virtual-key codes for digits and letters are their ASCII values
        0x30..=0x39 | 0x41..=0x5A => KeyInput::Char(char::from(vk as u8)),
        _ => KeyInput::Other,
    }
}

fn push_event(state: &RefCell<WindowState>, event: UiEvent) {
    match state.try_borrow_mut() {
        Ok(mut state) => state.events.push_back(event),
        Err(_) => tracing::warn!(?event, "Overlay state busy, dropping input"),
    }
}

unsafe extern "system" fn wndproc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_NCCREATE {
        let create = &*(lparam.0 as *const CREATESTRUCTW);
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, create.lpCreateParams as isize);
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }

    let ptr = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *const RefCell<WindowState>;
    if ptr.is_null() {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }
    let state = &*ptr;

    match msg {
        WM_LBUTTONDOWN => {
            let (x, y) = point_from_lparam(lparam);
            push_event(
                state,
                UiEvent::Click {
                    x: f64::from(x),
                    y: f64::from(y),
                },
            );
            let _ = SetFocus(hwnd);
            LRESULT(0)
        }
        WM_KEYDOWN => {
            let ctrl = GetKeyState(i32::from(VK_CONTROL.0)) < 0;
            push_event(
                state,
                UiEvent::Key {
                    key: key_input(wparam.0 as u16),
                    ctrl,
                },
            );
            LRESULT(0)
        }
        WM_COMMAND => {
            let event = match loword(wparam.0) {
                ID_MAP_SELECT if u32::from(hiword(wparam.0)) == CBN_SELCHANGE => {
                    let picker = HWND(lparam.0 as *mut c_void);
                    let index = SendMessageW(picker, CB_GETCURSEL, WPARAM(0), LPARAM(0)).0;
                    usize::try_from(index)
                        .ok()
                        .and_then(|i| MapCatalog::builtin().entries().get(i))
                        .map(|entry| UiEvent::SelectMap(entry.id.to_string()))
                }
                ID_ARTILLERY => Some(UiEvent::SetMode(InteractionMode::Artillery)),
                ID_TARGET => Some(UiEvent::SetMode(InteractionMode::Target)),
                ID_CLEAR => Some(UiEvent::Clear),
                ID_MINIMIZE => Some(UiEvent::Minimize),
                ID_CLOSE => Some(UiEvent::Close),
                _ => None,
            };
            if let Some(event) = event {
                push_event(state, event);
                // Keep keyboard shortcuts working after clicking a control
                let _ = SetFocus(hwnd);
            }
            LRESULT(0)
        }
        WM_NCHITTEST => {
            let hit = DefWindowProcW(hwnd, msg, wparam, lparam);
            if hit.0 != HTCLIENT as isize {
                return hit;
            }
            let (x, y) = point_from_lparam(lparam);
            let mut point = POINT { x, y };
            let _ = ScreenToClient(hwnd, &mut point);
            if point.y < TOOLBAR_HEIGHT {
                LRESULT(HTCAPTION as isize)
            } else {
                hit
            }
        }
        WM_SIZE => {
            let width = i32::from(loword(lparam.0 as usize));
            let height = i32::from(hiword(lparam.0 as usize));
            if wparam.0 as u32 != SIZE_MINIMIZED {
                let controls = state
                    .try_borrow()
                    .map(|s| s.controls.clone())
                    .unwrap_or_default();
                layout_toolbar(&controls, width);
                let relayout = match state.try_borrow_mut() {
                    Ok(mut state) => {
                        let natural = state
                            .image
                            .as_ref()
                            .map(|image| (image.width, image.height));
                        natural.map(|(natural_width, natural_height)| {
                            let layout = fit_image(width, height, natural_width, natural_height);
                            state.layout = Some(layout);
                            layout
                        })
                    }
                    Err(_) => None,
                };
                if let Some(layout) = relayout {
                    push_event(state, UiEvent::Relayout(layout));
                }
                let _ = InvalidateRect(hwnd, None, false);
            }
            LRESULT(0)
        }
        WM_GETMINMAXINFO => {
            let info = &mut *(lparam.0 as *mut MINMAXINFO);
            info.ptMinTrackSize = POINT {
                x: MIN_WIDTH,
                y: MIN_HEIGHT,
            };
            LRESULT(0)
        }
        WM_ACTIVATE => {
            // Take focus back shortly after losing it while shown
            if lost_activation(wparam) && IsWindowVisible(hwnd).as_bool() {
                SetTimer(hwnd, REFOCUS_TIMER_ID, REFOCUS_DELAY_MS, None);
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }
        WM_TIMER if wparam.0 == REFOCUS_TIMER_ID => {
            let _ = KillTimer(hwnd, REFOCUS_TIMER_ID);
            if IsWindowVisible(hwnd).as_bool() && !IsIconic(hwnd).as_bool() {
                tracing::debug!("Overlay lost focus, bringing it back");
                bring_to_front(hwnd);
            }
            LRESULT(0)
        }
        WM_EXITSIZEMOVE => {
            push_event(state, UiEvent::Moved(window_bounds(hwnd)));
            LRESULT(0)
        }
        WM_PAINT => {
            match state.try_borrow() {
                Ok(state) => paint(hwnd, &state),
                Err(_) => return DefWindowProcW(hwnd, msg, wparam, lparam),
            }
            LRESULT(0)
        }
        WM_ERASEBKGND => LRESULT(1),
        WM_CLOSE => {
            // The app decides; CloseOverlay destroys the window
            push_event(state, UiEvent::Close);
            LRESULT(0)
        }
        WM_NCDESTROY => {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

/// Paints the whole client area through an off-screen bitmap.
unsafe fn paint(hwnd: HWND, state: &WindowState) {
    let mut ps = PAINTSTRUCT::default();
    let hdc = BeginPaint(hwnd, &mut ps);

    let (width, height) = client_size(hwnd);
    let mem = CreateCompatibleDC(hdc);
    let bitmap = CreateCompatibleBitmap(hdc, width, height);
    let previous = SelectObject(mem, bitmap);

    let client = RECT {
        left: 0,
        top: 0,
        right: width,
        bottom: height,
    };
    fill(mem, client, BACKGROUND);
    fill(
        mem,
        RECT {
            bottom: TOOLBAR_HEIGHT,
            ..client
        },
        TOOLBAR,
    );
    SetBkMode(mem, TRANSPARENT);
    SetTextColor(mem, TEXT);

    draw_frame(mem, state, width, height);

    let _ = BitBlt(hdc, 0, 0, width, height, mem, 0, 0, SRCCOPY);
    SelectObject(mem, previous);
    let _ = DeleteObject(bitmap);
    let _ = DeleteDC(mem);
    let _ = EndPaint(hwnd, &ps);
}

unsafe fn draw_frame(hdc: HDC, state: &WindowState, width: i32, height: i32) {
    let view = &state.view;
    let map_area = RECT {
        left: 0,
        top: TOOLBAR_HEIGHT,
        right: width,
        bottom: height,
    };

    let mode_label = match view.mode {
        InteractionMode::Artillery => "Mode: Artillery",
        InteractionMode::Target => "Mode: Target",
    };
    let label_left = GAP + PICKER_WIDTH + 3 * (BUTTON_WIDTH + GAP) + GAP;
    let label_area = RECT {
        left: label_left,
        top: 0,
        right: width,
        bottom: TOOLBAR_HEIGHT,
    };
    draw_text(hdc, mode_label, label_area, DT_LEFT | DT_SINGLELINE | DT_VCENTER);

    if view.show_image {
        if let (Some(image), Some(layout)) = (&state.image, &state.layout) {
            draw_image(hdc, image, layout);
        }
    }

    if let Some(placeholder) = &view.placeholder {
        let mut text_area = map_area;
        text_area.top += (height - TOOLBAR_HEIGHT) / 2 - 30;
        draw_text(hdc, &placeholder.to_string(), text_area, DT_CENTER | DT_WORDBREAK);
    }

    if let Some((from, to)) = view.line {
        let pen = CreatePen(PS_SOLID, 2, LINE_COLOR);
        let previous = SelectObject(hdc, pen);
        let _ = MoveToEx(hdc, from.x.round() as i32, from.y.round() as i32, None);
        let _ = LineTo(hdc, to.x.round() as i32, to.y.round() as i32);
        SelectObject(hdc, previous);
        let _ = DeleteObject(pen);
    }
    if let Some(point) = view.artillery_marker {
        draw_marker(hdc, point, ARTILLERY_COLOR);
    }
    if let Some(point) = view.target_marker {
        draw_marker(hdc, point, TARGET_COLOR);
    }

    let footer = RECT {
        left: GAP * 2,
        top: height - 32,
        right: width - GAP * 2,
        bottom: height - 4,
    };
    if let Some(results) = &view.results {
        let text = format!("Distance: {}    Azimuth: {}", results.distance, results.azimuth);
        fill(hdc, footer, TOOLBAR);
        draw_text(hdc, &text, footer, DT_CENTER | DT_SINGLELINE | DT_VCENTER);
    } else if view.show_instructions {
        let text = match view.mode {
            InteractionMode::Artillery => "Click the map to place your artillery",
            InteractionMode::Target => "Click the map to place the target",
        };
        draw_text(hdc, text, footer, DT_CENTER | DT_SINGLELINE | DT_VCENTER);
    }
}

unsafe fn draw_image(hdc: HDC, image: &DecodedImage, layout: &ImageLayout) {
    let info = BITMAPINFO {
        bmiHeader: BITMAPINFOHEADER {
            biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: image.width as i32,
            // Negative height means top-down rows
            biHeight: -(image.height as i32),
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB.0,
            ..Default::default()
        },
        ..Default::default()
    };

    let origin: ScreenPoint = layout.origin;
    SetStretchBltMode(hdc, HALFTONE);
    StretchDIBits(
        hdc,
        origin.x.round() as i32,
        origin.y.round() as i32,
        layout.metrics.displayed_width.round() as i32,
        layout.metrics.displayed_height.round() as i32,
        0,
        0,
        image.width as i32,
        image.height as i32,
        Some(image.pixels.as_ptr() as *const c_void),
        &info,
        DIB_RGB_COLORS,
        SRCCOPY,
    );
}

unsafe fn draw_marker(hdc: HDC, point: ScreenPoint, color: COLORREF) {
    let brush = CreateSolidBrush(color);
    let previous = SelectObject(hdc, brush);
    let (x, y) = (point.x.round() as i32, point.y.round() as i32);
    let _ = Ellipse(
        hdc,
        x - MARKER_RADIUS,
        y - MARKER_RADIUS,
        x + MARKER_RADIUS,
        y + MARKER_RADIUS,
    );
    SelectObject(hdc, previous);
    let _ = DeleteObject(brush);
}

unsafe fn fill(hdc: HDC, rect: RECT, color: COLORREF) {
    let brush = CreateSolidBrush(color);
    FillRect(hdc, &rect, brush);
    let _ = DeleteObject(brush);
}

unsafe fn draw_text(hdc: HDC, text: &str, mut rect: RECT, format: DRAW_TEXT_FORMAT) {
    let mut wide: Vec<u16> = text.encode_utf16().collect();
    DrawTextW(hdc, &mut wide, &mut rect, format);
}
