use mazeflow::app::App;

fn main() -> std::io::Result<()> {
    // Log to a file; stdout belongs to the terminal UI. The guard must
    // outlive the app so buffered lines are flushed on exit.
    let file_appender = tracing_appender::rolling::never(".", "mazeflow.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let app = App::default();
    let result = app.run(&mut stdout);
    App::restore_terminal(&mut stdout)?;
    result
}
