use graphprep::cli;

// rewrites each file so that every PAPI line is followed by its measurement.

fn main() {
    cli::main(cli::pair);
}
