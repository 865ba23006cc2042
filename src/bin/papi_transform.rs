use graphprep::cli;

// reads an experiment log on stdin, prints "<run>,<max counter>..." per run.

fn main() {
    cli::main(cli::transform);
}
