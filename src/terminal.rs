//! Header redraw policy for interactive output.
//!
//! When stdout is a terminal the header is reprinted once per screenful so it
//! is always visible, and again right after the window is resized. SIGWINCH
//! only raises an atomic flag; the geometry query and all bookkeeping happen
//! on the sampling thread at the start of the next row.

use std::io::{self, IsTerminal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

/// Rows accounted for right after a header: the header plus the row under it.
const ROWS_AFTER_HEADER: usize = 2;

/// Anything that can report the terminal height in rows.
pub trait GeometrySource {
    /// Current row count, or `None` when it cannot be determined.
    fn rows(&self) -> Option<u16>;
}

impl<F> GeometrySource for F
where
    F: Fn() -> Option<u16>,
{
    fn rows(&self) -> Option<u16> {
        self()
    }
}

/// Queries the terminal attached to stdout with `TIOCGWINSZ`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TtyGeometry;

impl GeometrySource for TtyGeometry {
    fn rows(&self) -> Option<u16> {
        let mut ws = libc::winsize {
            ws_row: 0,
            ws_col: 0,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };
        // SAFETY: TIOCGWINSZ writes a winsize into the pointer we pass, which
        // points at a live, correctly typed local.
        let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
        if rc == 0 && ws.ws_row > 0 {
            Some(ws.ws_row)
        } else {
            None
        }
    }
}

/// What the policy currently knows about the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    /// Not a terminal (or redraw disabled): header once, never again.
    NoTerminal,
    /// A terminal whose height has not been read successfully yet.
    UnknownSize,
    /// A terminal with a known height.
    KnownSize(u16),
}

/// Installs a SIGWINCH handler that sets the returned flag.
pub fn register_resize_flag() -> io::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGWINCH, Arc::clone(&flag))?;
    Ok(flag)
}

/// Decides before each data row whether the header must be printed first.
pub struct RedrawPolicy<G> {
    geometry: G,
    state: TerminalState,
    resize_pending: Arc<AtomicBool>,
    rows_since_header: usize,
    header_printed: bool,
    force_header: bool,
}

impl<G: GeometrySource> RedrawPolicy<G> {
    /// Policy for non-interactive output.
    pub fn non_interactive(geometry: G) -> Self {
        Self {
            geometry,
            state: TerminalState::NoTerminal,
            resize_pending: Arc::new(AtomicBool::new(false)),
            rows_since_header: 0,
            header_printed: false,
            force_header: false,
        }
    }

    /// Policy for a terminal. `resize_pending` is the flag raised on resize;
    /// it is set here so the first row triggers the initial geometry query.
    pub fn interactive(geometry: G, resize_pending: Arc<AtomicBool>) -> Self {
        resize_pending.store(true, Ordering::SeqCst);
        Self {
            geometry,
            state: TerminalState::UnknownSize,
            resize_pending,
            rows_since_header: 0,
            header_printed: false,
            force_header: false,
        }
    }

    pub fn state(&self) -> TerminalState {
        self.state
    }

    pub fn rows_since_header(&self) -> usize {
        self.rows_since_header
    }

    pub fn resize_pending(&self) -> bool {
        self.resize_pending.load(Ordering::SeqCst)
    }

    /// Re-reads the geometry if a resize is pending. A failed query keeps
    /// the old geometry and leaves the resize pending for the next row.
    fn refresh_geometry(&mut self) {
        if self.state == TerminalState::NoTerminal {
            return;
        }
        if !self.resize_pending.swap(false, Ordering::SeqCst) {
            return;
        }

        match self.geometry.rows() {
            Some(rows) => {
                debug!("terminal geometry: {} rows", rows);
                self.state = TerminalState::KnownSize(rows);
                self.rows_since_header = ROWS_AFTER_HEADER;
                if self.header_printed {
                    self.force_header = true;
                }
            }
            None => {
                debug!("terminal geometry query failed, keeping {:?}", self.state);
                self.resize_pending.store(true, Ordering::SeqCst);
            }
        }
    }

    /// Accounts for the next data row and returns whether the header has to
    /// be printed before it.
    pub fn next_row(&mut self) -> bool {
        self.refresh_geometry();

        let screen_full = match self.state {
            TerminalState::KnownSize(rows) => self.rows_since_header >= usize::from(rows),
            _ => false,
        };
        let print_header = !self.header_printed || self.force_header || screen_full;

        if print_header {
            self.header_printed = true;
            self.force_header = false;
            self.rows_since_header = ROWS_AFTER_HEADER;
        } else {
            self.rows_since_header += 1;
        }

        debug!(
            "header={} rows_since_header={}",
            print_header, self.rows_since_header
        );
        print_header
    }
}

impl RedrawPolicy<TtyGeometry> {
    /// Picks the policy for the process's stdout.
    pub fn for_stdout(redraw: bool) -> Self {
        if !redraw || !io::stdout().is_terminal() {
            return Self::non_interactive(TtyGeometry);
        }
        match register_resize_flag() {
            Ok(flag) => Self::interactive(TtyGeometry, flag),
            Err(e) => {
                warn!("cannot watch terminal resizes: {}", e);
                Self::non_interactive(TtyGeometry)
            }
        }
    }
}
