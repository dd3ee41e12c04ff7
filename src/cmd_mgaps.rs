use clap::{crate_authors, crate_version, value_parser, Arg, ArgAction, ArgMatches, ColorChoice, Command};
use intspan::*;
use std::io::Write;

use mgaps::libs::cluster::{ChainScore, ClusterOpt, Clusterer};
use mgaps::libs::mum::{write_block, MumBlock, MumReader};

pub fn make_command() -> Command {
    Command::new("mgaps")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`mgaps` clusters MUMs based on diagonals and separation")
        .color(ColorChoice::Auto)
        .after_help(
            r###"
Input is the output of `mummer`: a `>` header line per query sequence,
followed by lines of `ref_start query_start length`. Other lines are ignored.

Processing:
  1. Matches inside repeats are dropped; overlapping matches on one diagonal are merged.
  2. Matches whose query separation is at most --max-sep and whose diagonals differ
     by at most max(--diag-diff, --diag-factor * separation) are joined into a cluster.
  3. Each cluster is split into chains by dynamic programming, penalizing overlaps
     and diagonal drift. Chains scoring at least --min-len are printed.

Output columns:
  ref_start query_start length overlap_trim ref_gap query_gap
  The header line precedes the first chain of a sequence, `#` each later chain.

Examples:
  mummer -mum -b -c ref.fa qry.fa | mgaps -l 100 > out.gaps
  mgaps -C -s 500 in.mums.gz -o out.gaps
"###,
        )
        .arg(
            Arg::new("infile")
                .help("Input file in mummer format. [stdin] for standard input")
                .default_value("stdin")
                .index(1),
        )
        .arg(
            Arg::new("outfile")
                .short('o')
                .long("outfile")
                .help("Output filename. [stdout] for screen")
                .default_value("stdout"),
        )
        .arg(
            Arg::new("check_labels")
                .short('C')
                .long("check-labels")
                .action(ArgAction::SetTrue)
                .help("Check that header labels alternately carry --label-marker"),
        )
        .arg(
            Arg::new("label_marker")
                .long("label-marker")
                .num_args(1)
                .default_value("Reverse")
                .help("Substring required in every second header with -C"),
        )
        .arg(
            Arg::new("diag_diff")
                .short('d')
                .long("diag-diff")
                .num_args(1)
                .default_value("5")
                .value_parser(value_parser!(i64))
                .help("Fixed diagonal difference to join matches"),
        )
        .arg(
            Arg::new("extent")
                .short('e')
                .long("extent")
                .action(ArgAction::SetTrue)
                .help("Use extent of match (end - start) rather than sum of piece lengths to determine length of cluster"),
        )
        .arg(
            Arg::new("diag_factor")
                .short('f')
                .long("diag-factor")
                .num_args(1)
                .default_value("0.05")
                .value_parser(value_parser!(f64))
                .help("Fraction of separation for diagonal difference"),
        )
        .arg(
            Arg::new("min_len")
                .short('l')
                .long("min-len")
                .num_args(1)
                .default_value("200")
                .value_parser(value_parser!(i64))
                .help("Minimum length of cluster match"),
        )
        .arg(
            Arg::new("max_sep")
                .short('s')
                .long("max-sep")
                .num_args(1)
                .default_value("1000")
                .value_parser(value_parser!(i64))
                .help("Maximum separation between matches in cluster"),
        )
}

pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let infile = args.get_one::<String>("infile").unwrap();
    let outfile = args.get_one::<String>("outfile").unwrap();

    let check_labels = args.get_flag("check_labels");
    let label_marker = args.get_one::<String>("label_marker").unwrap();

    let opt = ClusterOpt {
        fixed_separation: *args.get_one::<i64>("diag_diff").unwrap(),
        separation_factor: *args.get_one::<f64>("diag_factor").unwrap(),
        max_separation: *args.get_one::<i64>("max_sep").unwrap(),
        min_output_score: *args.get_one::<i64>("min_len").unwrap(),
        scoring: if args.get_flag("extent") {
            ChainScore::Extent
        } else {
            ChainScore::Sum
        },
    };
    log::debug!("{:?}", opt);

    //----------------------------
    // Ops
    //----------------------------
    let mut writer = writer(outfile);
    let mut clusterer = Clusterer::new(opt);

    let mut mum_reader = MumReader::new(reader(infile));
    let mut block = MumBlock::default();

    let mut n_block = 0;
    let mut n_chain = 0;
    while mum_reader.read_block(&mut block)? {
        n_block += 1;

        if check_labels && n_block % 2 == 0 && !block.header_contains(label_marker) {
            writer.flush()?;
            anyhow::bail!(
                "Header #{} lacks `{}`: {}",
                n_block,
                label_marker,
                block.label()
            );
        }

        log::debug!("{}", block.label());
        let chains = clusterer.process(&mut block.matches);
        n_chain += chains.len();

        write_block(&mut writer, &block.header, &chains)?;
    }
    writer.flush()?;

    log::info!("{} blocks, {} chains", n_block, n_chain);

    Ok(())
}
