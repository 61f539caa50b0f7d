use std::{
    io::{self, Write},
    time::Duration,
    thread,
    sync::{
        Arc,
        atomic::{ AtomicBool, AtomicU64, Ordering },
        mpsc::{ self, RecvTimeoutError },
    },
};

use crossterm::{
    terminal::{ self, EnterAlternateScreen, LeaveAlternateScreen, enable_raw_mode, disable_raw_mode, SetTitle, Clear, ClearType },
    cursor::{ MoveTo, Show, Hide },
    execute, queue,
    style::Print,
    event::{
        self,
        Event,
        KeyModifiers,
        KeyCode, KeyEventKind,
    },
};
use tracing::{debug, info, warn};

use crate::{
    engine::TransitionEngine,
    error::{EngineError, LifeError, Result},
    grid::{Grid, Rect},
};

/// Frame delays selectable with `j`/`k`, in milliseconds.
static DELAYS: [u64; 14] = [1, 10, 20, 40, 60, 100, 150, 200, 300, 450, 800, 1200, 1500, 2000];

/// How long the render loop waits on a paused or slow tick thread before
/// re-checking the flags.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Shared state between the tick, keyboard and render threads.
pub struct App {
    pub should_exit: AtomicBool,
    pub pause: AtomicBool,
    maxgen: AtomicU64,
    pub upd_timeout: AtomicU64,
}

impl Rect {
    pub fn term_size() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Rect::new(width as usize, height as usize))
    }
}

impl App {

    #[inline]
    pub fn new(maxgen: u64, delay: Duration) -> Self {
        App {
            should_exit: false.into(),
            pause: false.into(),
            maxgen: maxgen.into(),
            upd_timeout: (delay.as_millis().min(u64::MAX as u128) as u64).into(),
        }
    }

    #[inline]
    pub fn maxgen(&self) -> u64 {
        self.maxgen.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn should_exit(&self) -> bool {
        self.should_exit.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn pause(&self) -> bool {
        self.pause.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn upd_timeout(&self) -> u64 {
        self.upd_timeout.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn exit(&self) {
        self.should_exit.store(true, Ordering::Relaxed)
    }

    pub fn toggle_pause(&self) {
        self.pause.fetch_xor(true, Ordering::Relaxed);
    }

    /// Steps to the next shorter delay in [`DELAYS`].
    pub fn faster(&self) {
        let cur = self.upd_timeout();
        let next = DELAYS.iter().rev().find(|d| **d < cur).copied().unwrap_or(DELAYS[0]);
        self.upd_timeout.store(next, Ordering::Relaxed);
    }

    /// Steps to the next longer delay in [`DELAYS`].
    pub fn slower(&self) {
        let cur = self.upd_timeout();
        let next = DELAYS.iter().find(|d| **d > cur).copied().unwrap_or(DELAYS[DELAYS.len() - 1]);
        self.upd_timeout.store(next, Ordering::Relaxed);
    }
}

/// Runs the simulation in the terminal until `maxgen` generations were
/// shown or the user quits.
pub fn run(a: App, engine: TransitionEngine, world: Grid) -> Result<()> {
    let term = Rect::term_size()?;
    // One extra row for the status line.
    let needed = Rect::new(world.width(), world.height() + 1);
    if !needed.fits_within(&term) {
        return Err(LifeError::TerminalTooSmall {
            width: world.width(),
            height: world.height(),
            cols: term.w() as u16,
            rows: term.h() as u16,
        });
    }

    in_terminal(runup, move || draw(Arc::new(a), engine, world), shutdown)
}

/// Runs `body` between `setup` and `teardown`.
///
/// `teardown` also runs when `setup` fails half-way. The first error wins.
fn in_terminal<T>(
    setup: impl FnOnce() -> Result<()>,
    body: impl FnOnce() -> Result<T>,
    teardown: impl FnOnce() -> Result<()>,
) -> Result<T> {
    if let Err(e) = setup() {
        if let Err(t) = teardown() {
            warn!(error = %t, "terminal restore failed");
        }
        return Err(e);
    }
    let d = body();
    let s = teardown();
    match (d, s) {
        (Err(e), Err(t)) => {
            warn!(error = %t, "terminal restore failed");
            Err(e)
        }
        (d, s) => s.and(d),
    }
}

fn runup() -> Result<()> {
    execute!(io::stdout(), EnterAlternateScreen, SetTitle("Life"), Hide)?;
    enable_raw_mode()?;
    clear()?;
    Ok(())
}

fn shutdown() -> Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    disable_raw_mode()?;
    Ok(())
}

fn draw(a: Arc<App>, engine: TransitionEngine, world: Grid) -> Result<()> {
    // Capacity 1: the tick thread stays at most one generation ahead.
    let (tx, rx) = mpsc::sync_channel::<std::result::Result<Grid, EngineError>>(1);

    let maxgen = a.maxgen();
    let ticks = thread::Builder::new().name("Tick machine".into()).spawn(move || {
        for g in engine.generations(world).take(maxgen.try_into().unwrap_or(usize::MAX)) {
            if tx.send(g).is_err() {
                break;
            }
        }
    })?;

    let arc_keys = Arc::clone(&a);
    let keys = thread::Builder::new().name("Keyboard input".into()).spawn(move || {
        while !arc_keys.should_exit() {
            if let Err(e) = hotkeys(&arc_keys) {
                warn!(error = %e, "keyboard polling failed");
                arc_keys.exit();
            }
        }
    })?;

    let mut out = io::BufWriter::new(io::stdout());
    let result = render_loop(&mut out, &a, &rx).map(|shown| {
        info!(generations = shown, "simulation stopped");
    });

    a.exit();
    drop(rx);
    if ticks.join().is_err() {
        warn!("tick thread panicked");
    }
    if keys.join().is_err() {
        warn!("keyboard thread panicked");
    }
    result
}

/// Draws generations from `rx` until the sender hangs up or `a` asks to exit.
///
/// While paused the last frame is drawn once more so the status line shows
/// the pause. Returns the number of generations shown.
fn render_loop<W: Write>(
    out: &mut W,
    a: &App,
    rx: &mpsc::Receiver<std::result::Result<Grid, EngineError>>,
) -> Result<u64> {
    let mut gen = 0u64;
    let mut last: Option<Grid> = None;
    let mut paused_shown = false;

    while !a.should_exit() {
        if a.pause() {
            if !paused_shown {
                if let Some(field) = &last {
                    render_frame(out, field, gen.saturating_sub(1), a)?;
                }
                paused_shown = true;
            }
            thread::sleep(IDLE_POLL);
            continue;
        }
        paused_shown = false;

        let field = match rx.recv_timeout(IDLE_POLL) {
            Ok(field) => field?,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        render_frame(out, &field, gen, a)?;
        debug!(generation = gen, live = field.live_cells(), "rendered");
        gen += 1;
        last = Some(field);

        sleep_ms(a.upd_timeout());
    }

    Ok(gen)
}

/// Writes one frame: the grid with `@` for live cells, then a status line.
pub fn render_frame<W: Write>(out: &mut W, field: &Grid, gen: u64, a: &App) -> io::Result<()> {
    queue!(out, MoveTo(0, 0))?;
    for row in field.rows() {
        let line: String = row.iter().map(|c| if *c { '@' } else { ' ' }).collect();
        queue!(out, Print(line), Print("\r\n"))?;
    }
    queue!(
        out,
        Clear(ClearType::CurrentLine),
        Print(format!(
            "gen {gen}  live {}  delay {}ms{}",
            field.live_cells(),
            a.upd_timeout(),
            if a.pause() { "  [paused]" } else { "" },
        ))
    )?;
    out.flush()
}

fn clear() -> Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    Ok(())
}

fn sleep_ms(t: u64) {
    thread::sleep(Duration::from_millis(t))
}

fn hotkeys(a: &App) -> io::Result<()> {
    if event::poll(Duration::from_millis(150))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    if let KeyCode::Char('c') = key.code {
                        a.exit();
                    }
                } else {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => a.exit(),
                        KeyCode::Char('p') | KeyCode::Char(' ') => a.toggle_pause(),
                        KeyCode::Char('j') => a.faster(),
                        KeyCode::Char('k') => a.slower(),
                        _ => {},
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_steps_walk_the_table() {
        let a = App::new(10, Duration::from_millis(300));
        a.faster();
        assert_eq!(a.upd_timeout(), 200);
        a.slower();
        a.slower();
        assert_eq!(a.upd_timeout(), 450);
    }

    #[test]
    fn delay_steps_saturate() {
        let a = App::new(10, Duration::from_millis(1));
        a.faster();
        assert_eq!(a.upd_timeout(), 1);
        let a = App::new(10, Duration::from_millis(5000));
        a.slower();
        assert_eq!(a.upd_timeout(), 2000);
    }

    #[test]
    fn off_table_delay_snaps_to_neighbour() {
        let a = App::new(10, Duration::from_millis(250));
        a.faster();
        assert_eq!(a.upd_timeout(), 200);
    }

    #[test]
    fn pause_toggles() {
        let a = App::new(10, Duration::from_millis(300));
        assert!(!a.pause());
        a.toggle_pause();
        assert!(a.pause());
        a.toggle_pause();
        assert!(!a.pause());
    }

    type Tick = std::result::Result<Grid, EngineError>;

    fn blinker() -> Grid {
        Grid::parse(".....\n.....\n.###.\n.....\n.....\n").unwrap()
    }

    #[test]
    fn render_loop_stops_when_ticks_run_out() {
        let a = App::new(3, Duration::ZERO);
        let (tx, rx) = mpsc::sync_channel::<Tick>(3);
        for g in TransitionEngine::default().generations(blinker()).take(3) {
            tx.send(g).unwrap();
        }
        drop(tx);

        let mut buf = Vec::new();
        assert_eq!(render_loop(&mut buf, &a, &rx).unwrap(), 3);
        let s = String::from_utf8(buf).unwrap();
        assert!(s.contains("gen 2  live 3"));
        assert!(!s.contains("gen 3"));
    }

    #[test]
    fn render_loop_stops_on_exit() {
        let a = App::new(10, Duration::ZERO);
        let (tx, rx) = mpsc::sync_channel::<Tick>(1);
        tx.send(Ok(blinker())).unwrap();
        a.exit();

        let mut buf = Vec::new();
        assert_eq!(render_loop(&mut buf, &a, &rx).unwrap(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn render_loop_propagates_engine_errors() {
        let a = App::new(10, Duration::ZERO);
        let (tx, rx) = mpsc::sync_channel::<Tick>(2);
        tx.send(Ok(blinker())).unwrap();
        tx.send(Err(EngineError::Allocation { cells: 25 })).unwrap();
        drop(tx);

        let mut buf = Vec::new();
        let err = render_loop(&mut buf, &a, &rx).unwrap_err();
        assert!(matches!(err, LifeError::Engine(EngineError::Allocation { cells: 25 })));
    }

    #[test]
    fn pausing_redraws_with_marker() {
        let a = Arc::new(App::new(10, Duration::ZERO));
        let (tx, rx) = mpsc::sync_channel::<Tick>(1);
        tx.send(Ok(blinker())).unwrap();

        let control = Arc::clone(&a);
        let handle = thread::spawn(move || {
            // Keep the sender alive so the loop idles instead of finishing.
            let _tx = tx;
            thread::sleep(Duration::from_millis(150));
            control.toggle_pause();
            thread::sleep(Duration::from_millis(300));
            control.exit();
        });

        let mut buf = Vec::new();
        assert_eq!(render_loop(&mut buf, &a, &rx).unwrap(), 1);
        handle.join().unwrap();

        let s = String::from_utf8(buf).unwrap();
        assert_eq!(s.matches("gen 0  live 3").count(), 2);
        assert!(s.contains("[paused]"));
    }

    #[test]
    fn teardown_runs_when_setup_fails() {
        let restored = std::cell::Cell::new(false);
        let r: Result<()> = in_terminal(
            || Err(io::Error::other("raw mode").into()),
            || panic!("body must not run"),
            || {
                restored.set(true);
                Ok(())
            },
        );
        assert!(matches!(r, Err(LifeError::Io(_))));
        assert!(restored.get());
    }

    #[test]
    fn body_error_wins_over_teardown_error() {
        let r: Result<()> = in_terminal(
            || Ok(()),
            || Err(LifeError::UnknownPattern("x".into())),
            || Err(io::Error::other("restore").into()),
        );
        assert!(matches!(r, Err(LifeError::UnknownPattern(_))));

        let r: Result<u8> = in_terminal(|| Ok(()), || Ok(7), || Err(io::Error::other("restore").into()));
        assert!(matches!(r, Err(LifeError::Io(_))));
    }

    #[test]
    fn frame_shows_cells_and_status() {
        let a = App::new(10, Duration::from_millis(300));
        let g = Grid::parse("#.\n.#\n").unwrap();
        let mut buf = Vec::new();
        render_frame(&mut buf, &g, 7, &a).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.contains("@ \r\n @\r\n"));
        assert!(s.contains("gen 7  live 2  delay 300ms"));
        assert!(!s.contains("[paused]"));
    }
}
