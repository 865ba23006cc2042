use graphprep::cli;
use graphprep::dialect::Dialect;

// input lines are "<src> <dst>"; every line is an edge, self-loops included.
//
// prints "<src> <dst> 1" per edge with vertices relabeled into [0, nodes),
// then reminds on stderr of the "nodes edges" header the output still needs.

fn main() {
    cli::main(|args| cli::normalize(args, Dialect::Dense));
}
