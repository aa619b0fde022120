use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use termline_console::{
    Channel, CommandHandler, CommandTable, ConsoleConfig, ConsoleError, Context, Dispatcher,
    Outcome, SessionRegistry,
};
use termline_core::{NodeKind, ParsedLine};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Flagged(Arc<AtomicBool>);

impl Channel for Flagged {
    fn close(&self) -> io::Result<()> {
        self.0.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// `connect --host <host> [--port <port>]`, echoing what it was asked.
struct Connect;

impl CommandHandler for Connect {
    fn run(
        &self,
        _ctx: &Context<'_>,
        line: &ParsedLine,
        out: &mut dyn Write,
    ) -> termline_console::Result<Outcome> {
        let host = line.get_arg("host")?.value();
        let port = if line.is_set("port") {
            line.get_arg_string("port")?
        } else {
            "22"
        };
        writeln!(out, "{host}:{port}")?;
        Ok(Outcome::Continue)
    }

    fn help(&self, explain: bool) -> String {
        if explain {
            return "connect --host <host> [--port <port>]".to_string();
        }
        "Connect to a host".to_string()
    }
}

fn console(config: ConsoleConfig) -> (Dispatcher, Arc<SessionRegistry>) {
    let mut table = CommandTable::builtin();
    table.insert("connect", Connect);
    let registry = Arc::new(SessionRegistry::new());
    (
        Dispatcher::new(table, Arc::clone(&registry), config),
        registry,
    )
}

fn run(dispatcher: &Dispatcher, line: &str) -> termline_console::Result<String> {
    let mut out = Vec::new();
    dispatcher.execute(line, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[test]
fn custom_command_reads_flags() {
    let (dispatcher, _) = console(ConsoleConfig::default());
    assert_eq!(
        run(&dispatcher, "connect --host example.org").unwrap(),
        "example.org:22\n"
    );
    assert_eq!(
        run(&dispatcher, "connect --port 2222 --host example.org").unwrap(),
        "example.org:2222\n"
    );
}

#[test]
fn custom_command_surfaces_query_errors() {
    let (dispatcher, _) = console(ConsoleConfig::default());
    let err = run(&dispatcher, "connect").unwrap_err();
    assert_eq!(err.to_string(), "flag not set: host");

    let err = run(&dispatcher, "connect --host a b").unwrap_err();
    assert!(matches!(err, ConsoleError::QueryError(_)));
}

#[test]
fn kill_closes_session_channels() {
    let (dispatcher, registry) = console(ConsoleConfig::default());
    let server_closed = Arc::new(AtomicBool::new(false));
    let shell_closed = Arc::new(AtomicBool::new(false));

    let session = registry
        .add("client-7", Box::new(Flagged(Arc::clone(&server_closed))))
        .unwrap();
    session.attach_shell(Box::new(Flagged(Arc::clone(&shell_closed))));

    assert_eq!(run(&dispatcher, "ls").unwrap(), "client-7\n");
    assert_eq!(
        run(&dispatcher, "kill client-7").unwrap(),
        "client-7 disconnected\n"
    );
    assert!(server_closed.load(Ordering::SeqCst));
    assert!(shell_closed.load(Ordering::SeqCst));
    assert_eq!(run(&dispatcher, "ls").unwrap(), "No sessions\n");
}

#[test]
fn config_from_file_restricts_commands() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("console.yaml");
    std::fs::write(&path, "allowlist: [help, ls, exit]\n").unwrap();

    let config = ConsoleConfig::load(&path).unwrap();
    let (dispatcher, _) = console(config);

    assert!(run(&dispatcher, "ls").is_ok());
    assert!(matches!(
        run(&dispatcher, "connect --host x"),
        Err(ConsoleError::CommandDisabled(_))
    ));

    let ctx = dispatcher.complete_context("", 0);
    assert_eq!(ctx.candidates, vec!["exit", "help", "ls"]);
}

// ---------------------------------------------------------------------------
// Completion context
// ---------------------------------------------------------------------------

#[test]
fn completion_follows_cursor() {
    let (dispatcher, _) = console(ConsoleConfig::default());
    let raw = "connect --host ex --port";

    let ctx = dispatcher.complete_context(raw, 3);
    assert_eq!(ctx.focus.as_ref().unwrap().kind(), NodeKind::Command);
    assert_eq!(ctx.candidates, vec!["connect"]);

    let ctx = dispatcher.complete_context(raw, raw.find("ex ").unwrap() + 1);
    assert_eq!(ctx.focus.as_ref().unwrap().value(), "ex");
    assert_eq!(ctx.section.as_deref(), Some("host"));

    let ctx = dispatcher.complete_context(raw, raw.len());
    assert_eq!(ctx.focus.as_ref().unwrap().kind(), NodeKind::Flag);
    assert_eq!(ctx.section.as_deref(), Some("port"));
    assert!(ctx.candidates.is_empty());
}

#[test]
fn dispatch_from_many_threads() {
    let (dispatcher, registry) = console(ConsoleConfig::default());
    for n in 0..4 {
        registry
            .add(format!("s{n}"), Box::new(Flagged(Arc::new(AtomicBool::new(false)))))
            .unwrap();
    }
    let dispatcher = Arc::new(dispatcher);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let dispatcher = Arc::clone(&dispatcher);
            std::thread::spawn(move || {
                let mut out = Vec::new();
                dispatcher.execute("ls -f s", &mut out).unwrap();
                String::from_utf8(out).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "s0\ns1\ns2\ns3\n");
    }
}
