//! The orchestrator that turns [`Command`]s into window moves.
//!
//! [`Scratchpad`] resolves each command's targets through the
//! [`Querier`], moves them with the [`Mover`], and reports every step to an
//! [`EventSink`].  Batches are isolated per window: one failing window is
//! reported and the rest still run, and the command as a whole fails with
//! [`ScratchpadError::PartialFailure`] afterwards.

use crate::aerospace::check_server_version;
use crate::command::Command;
use crate::error::ScratchpadError;
use crate::filter::{apply_filters, parse_filters};
use crate::geometry::Geometry;
use crate::mover::Mover;
use crate::output::{EventSink, OutputEvent};
use crate::querier::Querier;
use crate::traits::WindowManager;
use crate::window::{Window, WindowId, APP_HOME_WORKSPACES, SCRATCHPAD_WORKSPACE};
use log::{debug, error, info, warn};
use std::fmt;
use std::path::PathBuf;

/// Per-command tally of failed windows.
#[derive(Debug, Default)]
struct Batch {
    failed: usize,
    total: usize,
}

impl Batch {
    fn finish(self) -> Result<(), ScratchpadError> {
        if self.failed > 0 {
            Err(ScratchpadError::PartialFailure {
                failed: self.failed,
                total: self.total,
            })
        } else {
            Ok(())
        }
    }
}

fn emit(sink: &mut dyn EventSink, event: OutputEvent) {
    if let Err(e) = sink.emit(event) {
        error!("unable to write output: {}", e);
    }
}

/// Diagnostics printed by `info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    pub server_version: String,
    pub socket_path: PathBuf,
    pub config_path: String,
    /// `Ok` when compatible, otherwise the reason.
    pub compatibility: Result<(), String>,
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AeroSpace Scratchpad")?;
        writeln!(f)?;
        writeln!(f, "[AeroSpace]")?;
        writeln!(f, "Version: {}", self.server_version)?;
        writeln!(f, "Socket: {}", self.socket_path.display())?;
        if !self.config_path.is_empty() {
            writeln!(f, "Config: {}", self.config_path)?;
        }
        writeln!(f)?;
        writeln!(f, "[AeroSpace scratchpad]")?;
        writeln!(f, "Workspace: {}", SCRATCHPAD_WORKSPACE)?;
        for (app, workspace) in APP_HOME_WORKSPACES {
            writeln!(f, "  {} -> {}", app, workspace)?;
        }
        writeln!(f)?;
        writeln!(f, "[Compatibility]")?;
        match &self.compatibility {
            Ok(()) => write!(f, "Status: Compatible."),
            Err(reason) => write!(f, "Status: Incompatible. Reason: {}", reason),
        }
    }
}

/// Runs scratchpad commands against a [`WindowManager`].
///
/// ```ignore
/// let wm = AeroSpaceWm::new(&config.ipc)?;
/// let scratchpad = Scratchpad::new(&wm);
/// let mut out = OutputFormatter::new(std::io::stdout(), OutputFormat::Text);
/// scratchpad.handle(&Command::Next, &mut out)?;
/// ```
pub struct Scratchpad<W: WindowManager> {
    wm: W,
}

impl<W: WindowManager> Scratchpad<W> {
    pub fn new(wm: W) -> Self {
        Self { wm }
    }

    fn querier(&self) -> Querier<&W> {
        Querier::new(&self.wm)
    }

    fn mover(&self) -> Mover<&W> {
        Mover::new(&self.wm)
    }

    fn focused_workspace(&self) -> Result<String, ScratchpadError> {
        self.wm
            .focused_workspace()
            .map(|ws| ws.name)
            .map_err(|e| ScratchpadError::adapter("get", "focused workspace", e))
    }

    /// Run one command, reporting each step to `sink`.
    pub fn handle(&self, cmd: &Command, sink: &mut dyn EventSink) -> Result<(), ScratchpadError> {
        info!("{}", cmd);
        let name = cmd.name();
        match cmd {
            Command::Move {
                pattern,
                all,
                all_floating,
                filters,
            } => self.move_windows(name, pattern.as_deref(), *all, *all_floating, filters, sink),
            Command::Show { pattern, filters } => self.show(name, pattern.as_deref(), filters, sink),
            Command::Summon {
                pattern,
                filters,
                geometry,
            } => self.summon(name, pattern, filters, *geometry, sink),
            Command::Next => self.next(name, sink),
            Command::List { filters } => self.list(name, filters, sink),
        }
    }

    fn move_windows(
        &self,
        name: &str,
        pattern: Option<&str>,
        all: bool,
        all_floating: bool,
        filters: &[String],
        sink: &mut dyn EventSink,
    ) -> Result<(), ScratchpadError> {
        let querier = self.querier();
        let mut focused_id = None;

        let targets: Vec<Window> = if all_floating {
            let parsed = parse_filters(filters)?;
            let mut targets = Vec::new();
            for window in querier.floating_windows()? {
                if !window.is_in_scratchpad() && apply_filters(&window, &parsed)? {
                    targets.push(window);
                }
            }
            targets
        } else {
            let target = querier.resolve_target(pattern)?;
            focused_id = target.focused_window;
            let mut windows = querier.filtered_windows(&target.pattern, filters)?;
            if target.is_default() && !all {
                windows.retain(|w| Some(w.id) == focused_id);
            }
            windows
        };

        if targets.is_empty() {
            debug!("nothing to move");
            emit(
                sink,
                OutputEvent::new(name, "to-scratchpad")
                    .target(SCRATCHPAD_WORKSPACE)
                    .result("none", "no windows to move"),
            );
            return Ok(());
        }

        let focused_id = match focused_id {
            Some(id) => Some(id),
            None => self.focused_window_id(),
        };

        let mover = self.mover();
        let mut batch = Batch {
            total: targets.len(),
            ..Default::default()
        };
        let mut hid_focused = false;

        for window in &targets {
            let event = OutputEvent::new(name, "to-scratchpad")
                .window(window)
                .target(SCRATCHPAD_WORKSPACE);
            match mover.move_to_scratchpad(window) {
                Ok(()) => {
                    hid_focused |= Some(window.id) == focused_id;
                    emit(sink, event.ok());
                }
                Err(e) if e.is_already_in_workspace() => {
                    debug!("skipping {}: {}", window, e);
                    emit(sink, event.result("skipped", e));
                }
                Err(e) => {
                    error!("unable to move {} to scratchpad: {}", window, e);
                    batch.failed += 1;
                    emit(sink, event.failed(e));
                }
            }
        }

        if hid_focused {
            if let Err(e) = self.wm.focus_next_tiling_window() {
                warn!("unable to focus next tiling window: {}", e);
            }
        }

        batch.finish()
    }

    /// Best-effort id of the focused window.
    fn focused_window_id(&self) -> Option<WindowId> {
        match self.wm.focused_window() {
            Ok(window) => window.map(|w| w.id),
            Err(e) => {
                warn!("unable to get focused window: {}", e);
                None
            }
        }
    }

    fn show(
        &self,
        name: &str,
        pattern: Option<&str>,
        filters: &[String],
        sink: &mut dyn EventSink,
    ) -> Result<(), ScratchpadError> {
        let querier = self.querier();
        let target = querier.resolve_target(pattern)?;
        let windows = querier.filtered_windows(&target.pattern, filters)?;
        let focused_ws = self.focused_workspace()?;

        let mut here = Vec::new();
        let mut elsewhere = Vec::new();
        for window in windows {
            let in_focused = if window.workspace.is_empty() {
                querier.is_window_in_workspace(window.id, &focused_ws)?
            } else {
                window.workspace == focused_ws
            };
            if in_focused {
                here.push(window);
            } else {
                elsewhere.push(window);
            }
        }

        let mut any_focused = false;
        for window in &here {
            any_focused |= querier.is_window_focused(window.id)?;
        }
        debug!(
            "show: {} here, {} elsewhere, focused here: {}",
            here.len(),
            elsewhere.len(),
            any_focused
        );

        let mover = self.mover();

        if elsewhere.is_empty() && any_focused {
            let mut batch = Batch {
                total: here.len(),
                ..Default::default()
            };
            for window in &here {
                let event = OutputEvent::new(name, "hide")
                    .window(window)
                    .target(SCRATCHPAD_WORKSPACE);
                match mover.move_to_scratchpad(window) {
                    Ok(()) => emit(sink, event.ok()),
                    Err(e) if e.is_already_in_workspace() => {
                        debug!("skipping {}: {}", window, e);
                        emit(sink, event.result("skipped", e));
                    }
                    Err(e) => {
                        error!("unable to hide {}: {}", window, e);
                        batch.failed += 1;
                        emit(sink, event.failed(e));
                    }
                }
            }
            return batch.finish();
        }

        let mut batch = Batch {
            total: here.len() + elsewhere.len(),
            ..Default::default()
        };

        for window in &elsewhere {
            let event = OutputEvent::new(name, "show")
                .window(window)
                .target(&focused_ws);
            match mover.move_to_workspace(window, &focused_ws, !any_focused) {
                Ok(()) => emit(sink, event.ok()),
                Err(e) => {
                    error!("unable to show {}: {}", window, e);
                    batch.failed += 1;
                    emit(sink, event.failed(e));
                }
            }
        }

        for window in &here {
            let event = OutputEvent::new(name, "focus")
                .window(window)
                .target(&focused_ws);
            match self.wm.set_focus(window.id) {
                Ok(()) => emit(sink, event.ok()),
                Err(e) => {
                    let e = ScratchpadError::adapter("set focus to window", window.id.to_string(), e);
                    error!("{}", e);
                    batch.failed += 1;
                    emit(sink, event.failed(e));
                }
            }
        }

        batch.finish()
    }

    fn summon(
        &self,
        name: &str,
        pattern: &str,
        filters: &[String],
        geometry: Option<Geometry>,
        sink: &mut dyn EventSink,
    ) -> Result<(), ScratchpadError> {
        let querier = self.querier();
        let target = querier.resolve_target(Some(pattern))?;
        let windows = querier.filtered_windows(&target.pattern, filters)?;
        let focused_ws = self.focused_workspace()?;

        let mover = self.mover();
        let mut batch = Batch {
            total: windows.len(),
            ..Default::default()
        };

        for window in &windows {
            let event = OutputEvent::new(name, "summon")
                .window(window)
                .target(&focused_ws);
            let result = mover
                .move_to_workspace(window, &focused_ws, true)
                .and_then(|()| match geometry {
                    Some(g) => mover.apply_geometry(window, g),
                    None => Ok(()),
                });
            match result {
                Ok(()) => emit(sink, event.ok()),
                Err(e) => {
                    error!("unable to summon {}: {}", window, e);
                    batch.failed += 1;
                    emit(sink, event.failed(e));
                }
            }
        }

        batch.finish()
    }

    fn next(&self, name: &str, sink: &mut dyn EventSink) -> Result<(), ScratchpadError> {
        let window = self.querier().next_scratchpad_window()?;
        let focused_ws = self.focused_workspace()?;

        self.mover().move_to_workspace(&window, &focused_ws, true)?;
        emit(
            sink,
            OutputEvent::new(name, "show")
                .window(&window)
                .target(&focused_ws)
                .ok(),
        );
        Ok(())
    }

    fn list(&self, name: &str, filters: &[String], sink: &mut dyn EventSink) -> Result<(), ScratchpadError> {
        let parsed = parse_filters(filters)?;
        let mut windows = Vec::new();
        for window in self.querier().scratchpad_windows()? {
            if apply_filters(&window, &parsed)? {
                windows.push(window);
            }
        }

        if windows.is_empty() {
            emit(
                sink,
                OutputEvent::new(name, "list").result("none", "no scratchpad windows found"),
            );
            return Ok(());
        }

        for window in &windows {
            emit(sink, OutputEvent::new(name, "list").window(window).ok());
        }
        Ok(())
    }

    /// Gather connection and compatibility diagnostics.
    pub fn info(&self) -> Result<Info, ScratchpadError> {
        let socket_path = self
            .wm
            .socket_path()
            .map_err(|e| ScratchpadError::adapter("get", "socket path", e))?;
        let response = self
            .wm
            .send_command("config", &["--config-path".to_string()])
            .map_err(|e| ScratchpadError::adapter("get", "AeroSpace config", e))?;

        let compatibility =
            check_server_version(&response.server_version).map_err(|e| e.to_string());

        Ok(Info {
            server_version: response.server_version,
            socket_path,
            config_path: response.stdout.trim().to_string(),
            compatibility,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputEvent;
    use crate::dry_run::DryRunWm;
    use crate::testing::{mv, Call, RecorderWm, SharedBuf};
    use crate::window::Layout;

    fn run(wm: &RecorderWm, cmd: Command) -> (Result<(), ScratchpadError>, Vec<OutputEvent>) {
        let mut events = Vec::new();
        let result = Scratchpad::new(wm).handle(&cmd, &mut events);
        (result, events)
    }

    fn show(pattern: &str) -> Command {
        Command::Show {
            pattern: Some(pattern.into()),
            filters: vec![],
        }
    }

    fn move_cmd(pattern: Option<&str>) -> Command {
        Command::Move {
            pattern: pattern.map(String::from),
            all: false,
            all_floating: false,
            filters: vec![],
        }
    }

    /// Mutations plus focus queries, which is what the grouping rule
    /// constrains.
    fn relevant(wm: &RecorderWm) -> Vec<Call> {
        wm.calls()
            .into_iter()
            .filter(|c| c.is_mutation() || *c == Call::FocusedWindow)
            .collect()
    }

    fn finders_and_terminal(f1: &str, f2: &str) -> RecorderWm {
        RecorderWm::new()
            .with_window(1, "Finder", f1)
            .with_window(2, "Finder", f2)
            .with_window(3, "Terminal", "ws2")
    }

    //  dry run

    #[test]
    fn dry_run_commands_change_nothing() {
        let rec = finders_and_terminal("ws1", "ws1").focused_on(3);
        let buf = SharedBuf::default();
        let wm = DryRunWm::with_writer(&rec, buf.clone());
        let scratchpad = Scratchpad::new(&wm);
        let mut events = Vec::new();

        scratchpad.handle(&move_cmd(Some("Finder")), &mut events).unwrap();
        scratchpad.handle(&show("Terminal"), &mut events).unwrap();

        assert!(rec.mutations().is_empty());
        assert_eq!(rec.windows.borrow()[2].workspace, "ws2");

        let out = buf.contents();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5, "{}", out);
        assert!(lines.iter().all(|l| l.starts_with("[dry-run] would ")));
        assert_eq!(lines[0], "[dry-run] would move window 1 to workspace .scratchpad");
        assert_eq!(
            lines[4],
            "[dry-run] would move window 3 to workspace ws1 with focus following"
        );

        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.result == "ok"));
        assert_eq!(events[2].command, "show");
    }

    //  show

    #[test]
    fn show_brings_both_from_other_workspace() {
        let wm = finders_and_terminal("ws1", "ws1").in_workspace("ws2").focused_on(3);
        let (result, events) = run(&wm, show("Finder"));
        result.unwrap();
        assert_eq!(
            relevant(&wm),
            vec![mv(1, "ws2"), Call::SetFocus(1), mv(2, "ws2"), Call::SetFocus(2)]
        );
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.action == "show" && e.result == "ok"));
    }

    #[test]
    fn show_split_workspaces_unfocused() {
        let wm = finders_and_terminal("ws1", "ws2").in_workspace("ws2").focused_on(3);
        run(&wm, show("Finder")).0.unwrap();
        assert_eq!(
            relevant(&wm),
            vec![Call::FocusedWindow, mv(1, "ws2"), Call::SetFocus(1), Call::SetFocus(2)]
        );
    }

    #[test]
    fn show_split_workspaces_with_focused_match() {
        let wm = finders_and_terminal("ws1", "ws2").in_workspace("ws2").focused_on(2);
        run(&wm, show("Finder")).0.unwrap();
        assert_eq!(
            relevant(&wm),
            vec![Call::FocusedWindow, mv(1, "ws2"), Call::SetFocus(2)]
        );
    }

    #[test]
    fn show_hides_when_all_here_and_focused() {
        let wm = finders_and_terminal("ws2", "ws2").in_workspace("ws2").focused_on(1);
        let (result, events) = run(&wm, show("Finder"));
        result.unwrap();
        assert_eq!(
            relevant(&wm),
            vec![
                Call::FocusedWindow,
                Call::FocusedWindow,
                mv(1, SCRATCHPAD_WORKSPACE),
                Call::SetLayout(1, Layout::Floating),
                mv(2, SCRATCHPAD_WORKSPACE),
                Call::SetLayout(2, Layout::Floating),
            ]
        );
        assert!(events.iter().all(|e| e.action == "hide"));
    }

    #[test]
    fn show_focuses_when_all_here_but_unfocused() {
        let wm = finders_and_terminal("ws2", "ws2").in_workspace("ws2").focused_on(3);
        run(&wm, show("Finder")).0.unwrap();
        assert_eq!(wm.mutations(), vec![Call::SetFocus(1), Call::SetFocus(2)]);
    }

    #[test]
    fn show_checks_membership_when_workspace_unknown() {
        let wm = RecorderWm::new()
            .with_window(1, "Finder", "")
            .in_workspace("ws2");
        run(&wm, show("Finder")).0.unwrap();
        assert!(wm
            .calls()
            .contains(&Call::WindowsInWorkspace("ws2".into())));
        assert_eq!(wm.mutations(), vec![mv(1, "ws2"), Call::SetFocus(1)]);
    }

    #[test]
    fn show_isolates_failing_window() {
        let wm = finders_and_terminal("ws1", "ws1").in_workspace("ws2").focused_on(3);
        wm.failing_moves.borrow_mut().insert(1);
        let (result, events) = run(&wm, show("Finder"));
        assert!(matches!(
            result,
            Err(ScratchpadError::PartialFailure { failed: 1, total: 2 })
        ));
        assert!(events[0].is_error());
        assert_eq!(events[1].result, "ok");
        assert_eq!(wm.count(&mv(2, "ws2")), 1);
    }

    #[test]
    fn show_without_pattern_toggles_focused_app() {
        let wm = finders_and_terminal("ws2", "ws1").in_workspace("ws2").focused_on(3);
        run(&wm, Command::Show { pattern: None, filters: vec![] }).0.unwrap();
        assert_eq!(
            wm.mutations(),
            vec![mv(3, SCRATCHPAD_WORKSPACE), Call::SetLayout(3, Layout::Floating)]
        );
    }

    #[test]
    fn show_no_match_is_error() {
        let wm = finders_and_terminal("ws1", "ws1");
        let (result, _) = run(&wm, show("Safari"));
        assert!(matches!(result, Err(ScratchpadError::NoMatchingWindows { .. })));
        assert!(wm.mutations().is_empty());
    }

    //  move

    #[test]
    fn move_explicit_pattern_hides_all_matches() {
        let wm = finders_and_terminal("ws1", "ws1").focused_on(3);
        let (result, events) = run(&wm, move_cmd(Some("Finder")));
        result.unwrap();
        assert_eq!(
            wm.mutations(),
            vec![
                mv(1, SCRATCHPAD_WORKSPACE),
                Call::SetLayout(1, Layout::Floating),
                mv(2, SCRATCHPAD_WORKSPACE),
                Call::SetLayout(2, Layout::Floating),
            ]
        );
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn move_default_pattern_hides_only_focused() {
        let wm = finders_and_terminal("ws1", "ws1").focused_on(2);
        run(&wm, move_cmd(None)).0.unwrap();
        assert_eq!(
            wm.mutations(),
            vec![
                mv(2, SCRATCHPAD_WORKSPACE),
                Call::SetLayout(2, Layout::Floating),
                Call::FocusNext,
            ]
        );
    }

    #[test]
    fn move_default_pattern_with_all_hides_whole_app() {
        let wm = finders_and_terminal("ws1", "ws1").focused_on(2);
        let cmd = Command::Move {
            pattern: None,
            all: true,
            all_floating: false,
            filters: vec![],
        };
        run(&wm, cmd).0.unwrap();
        assert_eq!(wm.count(&mv(1, SCRATCHPAD_WORKSPACE)), 1);
        assert_eq!(wm.count(&mv(2, SCRATCHPAD_WORKSPACE)), 1);
        assert_eq!(wm.count(&Call::FocusNext), 1);
    }

    #[test]
    fn move_without_focus_fails() {
        let wm = finders_and_terminal("ws1", "ws1");
        let (result, _) = run(&wm, move_cmd(None));
        assert!(matches!(result, Err(ScratchpadError::NoFocusedWindow)));
    }

    #[test]
    fn move_all_floating_skips_parked_windows() {
        let wm = RecorderWm::new()
            .with_window(1, "Tiled", "ws1")
            .with(Window {
                id: WindowId(2),
                app_name: "Floaty".into(),
                workspace: "ws1".into(),
                layout: Layout::Floating,
                ..Default::default()
            })
            .with(Window {
                id: WindowId(3),
                app_name: "Parked".into(),
                workspace: SCRATCHPAD_WORKSPACE.into(),
                layout: Layout::Floating,
                ..Default::default()
            });
        let cmd = Command::Move {
            pattern: None,
            all: false,
            all_floating: true,
            filters: vec![],
        };
        run(&wm, cmd).0.unwrap();
        assert_eq!(
            wm.mutations(),
            vec![mv(2, SCRATCHPAD_WORKSPACE), Call::SetLayout(2, Layout::Floating)]
        );
    }

    #[test]
    fn move_skips_already_parked_silently() {
        let wm = finders_and_terminal(SCRATCHPAD_WORKSPACE, "ws1");
        let (result, events) = run(&wm, move_cmd(Some("Finder")));
        result.unwrap();
        assert_eq!(events[0].result, "skipped");
        assert_eq!(events[1].result, "ok");
    }

    #[test]
    fn move_partial_failure_finishes_batch() {
        let wm = finders_and_terminal("ws1", "ws1");
        wm.failing_moves.borrow_mut().insert(1);
        let (result, events) = run(&wm, move_cmd(Some("Finder")));
        assert!(matches!(
            result,
            Err(ScratchpadError::PartialFailure { failed: 1, total: 2 })
        ));
        assert_eq!(events.len(), 2);
        assert_eq!(wm.count(&mv(2, SCRATCHPAD_WORKSPACE)), 1);
    }

    #[test]
    fn move_invalid_pattern_mutates_nothing() {
        let wm = finders_and_terminal("ws1", "ws1");
        let (result, _) = run(&wm, move_cmd(Some("[bad")));
        assert!(matches!(result, Err(ScratchpadError::InvalidPattern { .. })));
        assert!(wm.mutations().is_empty());
    }

    //  summon / next / list

    #[test]
    fn summon_moves_focuses_and_resizes() {
        let wm = finders_and_terminal(SCRATCHPAD_WORKSPACE, "ws3").in_workspace("ws2");
        let g: Geometry = "60%x90%".parse().unwrap();
        let cmd = Command::Summon {
            pattern: "Finder".into(),
            filters: vec![],
            geometry: Some(g),
        };
        run(&wm, cmd).0.unwrap();
        assert_eq!(
            wm.mutations(),
            vec![
                mv(1, "ws2"),
                Call::SetFocus(1),
                Call::SetLayout(1, Layout::Floating),
                Call::Resize(1, g),
                mv(2, "ws2"),
                Call::SetFocus(2),
                Call::SetLayout(2, Layout::Floating),
                Call::Resize(2, g),
            ]
        );
    }

    #[test]
    fn summon_with_filter() {
        let wm = RecorderWm::new()
            .with(Window {
                id: WindowId(1),
                app_name: "Finder".into(),
                title: "Downloads".into(),
                workspace: SCRATCHPAD_WORKSPACE.into(),
                ..Default::default()
            })
            .with(Window {
                id: WindowId(2),
                app_name: "Finder".into(),
                title: "Documents".into(),
                workspace: SCRATCHPAD_WORKSPACE.into(),
                ..Default::default()
            });
        let cmd = Command::Summon {
            pattern: "Finder".into(),
            filters: vec!["window-title=Doc".into()],
            geometry: None,
        };
        run(&wm, cmd).0.unwrap();
        assert_eq!(wm.mutations(), vec![mv(2, "ws1"), Call::SetFocus(2)]);
    }

    #[test]
    fn next_brings_first_parked_window() {
        let wm = RecorderWm::new()
            .with_window(10, "A", "ws1")
            .with_window(77, "B", SCRATCHPAD_WORKSPACE)
            .with_window(78, "C", SCRATCHPAD_WORKSPACE);
        let (result, events) = run(&wm, Command::Next);
        result.unwrap();
        assert_eq!(wm.mutations(), vec![mv(77, "ws1"), Call::SetFocus(77)]);
        assert_eq!(events[0].window_id, WindowId(77));
    }

    #[test]
    fn next_with_empty_scratchpad_fails() {
        let wm = RecorderWm::new().with_window(10, "A", "ws1");
        let (result, _) = run(&wm, Command::Next);
        assert!(matches!(result, Err(ScratchpadError::NoScratchpadWindows)));
        assert!(wm.mutations().is_empty());
    }

    #[test]
    fn list_reports_scratchpad_windows() {
        let wm = RecorderWm::new()
            .with_window(1, "Finder", SCRATCHPAD_WORKSPACE)
            .with_window(2, "Terminal", "ws1");
        let (result, events) = run(&wm, Command::List { filters: vec![] });
        result.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].window_id, WindowId(1));
        assert_eq!(events[0].result, "ok");
        assert!(wm.mutations().is_empty());
    }

    #[test]
    fn list_empty_reports_none() {
        let wm = RecorderWm::new().with_window(2, "Terminal", "ws1");
        let (_, events) = run(&wm, Command::List { filters: vec![] });
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].result, "none");
        assert_eq!(events[0].message, "no scratchpad windows found");
    }

    #[test]
    fn list_rejects_malformed_filter() {
        let wm = RecorderWm::new().with_window(1, "Finder", SCRATCHPAD_WORKSPACE);
        let (result, _) = run(
            &wm,
            Command::List {
                filters: vec!["window-title".into()],
            },
        );
        assert!(matches!(result, Err(ScratchpadError::MalformedFilter(_))));
    }

    #[test]
    fn info_reports_compatibility() {
        let wm = RecorderWm::new();
        let info = Scratchpad::new(&wm).info().unwrap();
        assert_eq!(info.server_version, "0.19.2-Beta");
        assert!(info.compatibility.is_ok());
        let text = info.to_string();
        assert!(text.contains("Socket: /tmp/recorder.sock"));
        assert!(text.contains("Status: Compatible."));
        assert!(wm.mutations().is_empty());
    }
}
