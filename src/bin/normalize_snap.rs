use graphprep::cli;
use graphprep::dialect::Dialect;

// input lines are "<src>\t<dst>"; '#' lines are comments, self-loops are dropped.
//
// prints "<src> <dst> 1" per edge with vertices relabeled into [0, nodes),
// then reminds on stderr of the "nodes edges" header the output still needs.

fn main() {
    cli::main(|args| cli::normalize(args, Dialect::Sparse));
}
