use async_trait::async_trait;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use voltdb_cli::commands::{
    CapabilitySet, CommandDescriptor, CommandHandler, CommandRegistry, RejoinCommand, REJOIN_WARNING,
};
use voltdb_cli::engine::{CommandRunner, Delegate, Environment, ExecutionContext, Invocation};
use voltdb_cli::utils::{ArgSet, CliConfig, ErrorKind, ExitStatus, RegistryError, VoltError, VoltResult};

/// Writer shared between the runner and the test
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Writer whose every write fails, like a closed stderr
struct ClosedWriter;

impl Write for ClosedWriter {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
    }
}

/// Delegate recording each hand-off and returning a fixed status
#[derive(Clone)]
struct RecordingDelegate {
    status: ExitStatus,
    calls: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl RecordingDelegate {
    fn returning(status: ExitStatus) -> Self {
        Self {
            status,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delegate for RecordingDelegate {
    async fn go(&self, invocation: Invocation<'_>, _output: &mut (dyn Write + Send)) -> VoltResult<ExitStatus> {
        self.calls.lock().unwrap().push((
            invocation.descriptor.action().to_string(),
            invocation.args.host.clone(),
        ));
        Ok(self.status)
    }
}

/// Handler counting how often it is reached
struct CountingHandler(Arc<AtomicUsize>);

#[async_trait]
impl CommandHandler for CountingHandler {
    async fn execute(&self, ctx: &mut ExecutionContext<'_>, _args: &ArgSet) -> VoltResult<ExitStatus> {
        self.0.fetch_add(1, Ordering::SeqCst);
        ctx.delegate().await
    }
}

fn clean_environment() -> Environment {
    Environment::from_lookup(&CliConfig::default(), |_| None)
}

fn builtin_runner(delegate: &RecordingDelegate, output: &SharedBuffer) -> CommandRunner {
    let registry = CommandRegistry::with_builtin_commands().unwrap();
    CommandRunner::new(registry, clean_environment(), Box::new(delegate.clone()))
        .with_output(Box::new(output.clone()))
}

#[tokio::test]
async fn test_rejoin_warns_once_then_delegates() {
    let delegate = RecordingDelegate::returning(ExitStatus::Success);
    let output = SharedBuffer::default();
    let mut runner = builtin_runner(&delegate, &output);

    let status = runner.run("rejoin", ArgSet::new()).await.unwrap();

    assert_eq!(status, ExitStatus::Success);
    let printed = output.contents();
    assert_eq!(printed.matches("WARNING:").count(), 1);
    assert!(printed.contains(REJOIN_WARNING));
    assert!(printed.contains("'init'"));
    assert!(printed.contains("'start'"));
    assert_eq!(delegate.calls(), vec![("rejoin".to_string(), None)]);
}

#[tokio::test]
async fn test_rejoin_returns_delegated_failure_unchanged() {
    let delegate = RecordingDelegate::returning(ExitStatus::Failure(42));
    let output = SharedBuffer::default();
    let mut runner = builtin_runner(&delegate, &output);

    let status = runner.run("rejoin", ArgSet::new()).await.unwrap();

    assert_eq!(status, ExitStatus::Failure(42));
}

#[tokio::test]
async fn test_rejoin_delegates_when_warning_cannot_be_written() {
    let delegate = RecordingDelegate::returning(ExitStatus::Success);
    let mut runner = CommandRunner::new(
        CommandRegistry::with_builtin_commands().unwrap(),
        clean_environment(),
        Box::new(delegate.clone()),
    )
    .with_output(Box::new(ClosedWriter));

    let status = runner.run("rejoin", ArgSet::new()).await.unwrap();

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(delegate.calls(), vec![("rejoin".to_string(), None)]);
}

#[tokio::test]
async fn test_rejoin_warns_on_every_invocation() {
    let delegate = RecordingDelegate::returning(ExitStatus::Success);
    let output = SharedBuffer::default();
    let mut runner = builtin_runner(&delegate, &output);

    runner.run("rejoin", ArgSet::new()).await.unwrap();
    runner.run("rejoin", ArgSet::new()).await.unwrap();

    assert_eq!(output.contents().matches("WARNING:").count(), 2);
    assert_eq!(delegate.calls().len(), 2);
}

#[tokio::test]
async fn test_rejoin_passes_requested_modes_through() {
    let delegate = RecordingDelegate::returning(ExitStatus::Success);
    let output = SharedBuffer::default();
    let mut runner = builtin_runner(&delegate, &output);

    let args = ArgSet::new().with_host("node3").with_live().with_instance("west");
    runner.run("rejoin", args).await.unwrap();

    assert_eq!(delegate.calls(), vec![("rejoin".to_string(), Some("node3".to_string()))]);
}

#[tokio::test]
async fn test_rejoin_is_hidden_but_invocable() {
    let delegate = RecordingDelegate::returning(ExitStatus::Success);
    let output = SharedBuffer::default();
    let mut runner = builtin_runner(&delegate, &output);

    let visible: Vec<&str> = runner.registry().list(false).iter().map(|d| d.name()).collect();
    assert!(!visible.contains(&"rejoin"));
    assert!(visible.contains(&"init"));
    assert!(visible.contains(&"start"));

    assert!(runner.run("rejoin", ArgSet::new()).await.is_ok());
}

#[tokio::test]
async fn test_start_fills_default_host_and_rejoin_does_not() {
    let delegate = RecordingDelegate::returning(ExitStatus::Success);
    let output = SharedBuffer::default();
    let mut runner = builtin_runner(&delegate, &output);

    runner.run("start", ArgSet::new()).await.unwrap();
    runner.run("rejoin", ArgSet::new()).await.unwrap();

    assert_eq!(
        delegate.calls(),
        vec![
            ("probe".to_string(), Some("localhost".to_string())),
            ("rejoin".to_string(), None),
        ]
    );
    // Only rejoin warns
    assert_eq!(output.contents().matches("WARNING:").count(), 1);
}

#[tokio::test]
async fn test_unknown_command() {
    let delegate = RecordingDelegate::returning(ExitStatus::Success);
    let output = SharedBuffer::default();
    let mut runner = builtin_runner(&delegate, &output);

    let err = runner.run("does-not-exist", ArgSet::new()).await.unwrap_err();

    match err {
        VoltError::Registry(RegistryError::UnknownCommand(name)) => assert_eq!(name, "does-not-exist"),
        other => panic!("Expected UnknownCommand, got {:?}", other),
    }
    assert!(delegate.calls().is_empty());
    assert!(output.contents().is_empty());
}

#[tokio::test]
async fn test_unmet_prerequisite_never_reaches_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = CommandRegistry::new();
    registry
        .register(
            CommandDescriptor::new("recover", "Recover from a snapshot").with_requirements(CapabilitySet {
                needs_catalog: true,
                ..CapabilitySet::default()
            }),
            Box::new(CountingHandler(calls.clone())),
        )
        .unwrap();

    let delegate = RecordingDelegate::returning(ExitStatus::Success);
    let mut runner = CommandRunner::new(registry, clean_environment(), Box::new(delegate.clone()))
        .with_output(Box::new(std::io::sink()));

    let err = runner.run("recover", ArgSet::new()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PrerequisiteNotMet);
    assert!(err.to_string().contains("recover"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(delegate.calls().is_empty());
}

#[tokio::test]
async fn test_environment_problems_block_rejoin() {
    let environment = Environment::from_lookup(&CliConfig::default(), |key| {
        (key == "VOLTDB_HEAPMAX").then(|| "-1".to_string())
    });
    let delegate = RecordingDelegate::returning(ExitStatus::Success);
    let output = SharedBuffer::default();
    let mut runner = CommandRunner::new(
        CommandRegistry::with_builtin_commands().unwrap(),
        environment,
        Box::new(delegate.clone()),
    )
    .with_output(Box::new(output.clone()));

    let err = runner.run("rejoin", ArgSet::new()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PrerequisiteNotMet);
    assert!(err.to_string().contains("VOLTDB_HEAPMAX"));
    // Rejected before the handler: no warning printed
    assert!(output.contents().is_empty());
    assert!(delegate.calls().is_empty());
}

#[tokio::test]
async fn test_init_rejects_background() {
    let delegate = RecordingDelegate::returning(ExitStatus::Success);
    let output = SharedBuffer::default();
    let mut runner = builtin_runner(&delegate, &output);

    let err = runner.run("init", ArgSet::new().with_background()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PrerequisiteNotMet);
    assert!(err.to_string().contains("background"));
}

#[test]
fn test_lookup_returns_registered_descriptor() {
    let mut registry = CommandRegistry::new();
    let descriptor = RejoinCommand::descriptor();

    registry.register(descriptor.clone(), Box::new(RejoinCommand)).unwrap();

    assert_eq!(registry.lookup("rejoin").unwrap(), &descriptor);

    let err = registry.register(RejoinCommand::descriptor(), Box::new(RejoinCommand)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateCommand);
}
