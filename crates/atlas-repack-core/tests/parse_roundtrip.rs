use atlas_repack_core::diag::NullDiag;
use atlas_repack_core::parse::parse_atlas;
use atlas_repack_core::serialize::serialize_atlas;

const SAMPLE: &str = "\
a.png
size: 100,100
format: RGBA8888
filter: Linear,Linear
repeat: none

r1
  rotate: false
  xy: 0, 0
  size: 10, 20
  orig: 10, 20
  offset: 0, 0

b_00016
  rotate: true
  xy: 12, 2
  size: 30, 14
  orig: 32, 16
  offset: 1, 1
  index: 1

b.png
size: 64,32

tail
  xy: 4, 4
  size: 8, 8
";

#[test]
fn parses_pages_and_regions() {
    let atlas = parse_atlas(SAMPLE, &NullDiag);
    assert_eq!(atlas.pages.len(), 2);
    assert_eq!(atlas.region_count(), 3);

    let a = &atlas.pages[0];
    assert_eq!(a.name, "a.png");
    assert_eq!(a.size, Some((100, 100)));
    assert_eq!(a.format, "RGBA8888");
    assert_eq!(a.filter, ("Linear".to_string(), "Linear".to_string()));
    assert_eq!(a.repeat, "none");
    assert_eq!(a.regions.len(), 2);

    let r1 = &a.regions[0];
    assert_eq!(r1.name, "r1");
    assert!(!r1.rotate);
    assert_eq!(r1.xy, (0, 0));
    assert_eq!(r1.size, (10, 20));
    assert_eq!(r1.orig, (10, 20));
    assert_eq!(r1.offset, (0, 0));
    assert_eq!(r1.index, -1);

    let b = &a.regions[1];
    assert!(b.rotate);
    assert_eq!(b.index, 1);

    let second = &atlas.pages[1];
    assert_eq!(second.name, "b.png");
    assert_eq!(second.size, Some((64, 32)));
    assert!(second.format.is_empty());
    assert_eq!(second.regions.len(), 1);
}

#[test]
fn round_trip_preserves_every_field() {
    let first = parse_atlas(SAMPLE, &NullDiag);
    let text = serialize_atlas(&first);
    let second = parse_atlas(&text, &NullDiag);
    assert_eq!(first, second);
}

#[test]
fn round_trip_is_stable_after_one_pass() {
    let first = parse_atlas(SAMPLE, &NullDiag);
    let text = serialize_atlas(&first);
    let text_again = serialize_atlas(&parse_atlas(&text, &NullDiag));
    assert_eq!(text, text_again);
}

#[test]
fn index_only_written_when_non_negative() {
    let atlas = parse_atlas(SAMPLE, &NullDiag);
    let text = serialize_atlas(&atlas);
    // r1 has index -1, b_00016 has index 1.
    let r1_block: Vec<&str> = text
        .lines()
        .skip_while(|l| *l != "r1")
        .take_while(|l| !l.is_empty())
        .collect();
    assert!(!r1_block.iter().any(|l| l.trim_start().starts_with("index:")));
    assert!(text.contains("  index: 1\n"));
}

#[test]
fn orig_defaults_to_size_when_absent() {
    let atlas = parse_atlas(SAMPLE, &NullDiag);
    let tail = &atlas.pages[1].regions[0];
    assert_eq!(tail.size, (8, 8));
    assert_eq!(tail.orig, (8, 8));
}
