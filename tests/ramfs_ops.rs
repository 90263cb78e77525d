//! Handler-level tests driving `RamFs` through the `FileSystem` trait.

use atomic_ramfs::{FileSystem, FileType, FixedClock, FsError, MountOptions, RamFs, Timestamp};

fn clock() -> FixedClock {
    FixedClock(Timestamp::new(2024, 1, 2, 3, 4, 5))
}

fn mount() -> RamFs {
    RamFs::new("ramfs", MountOptions::default(), clock())
}

fn mount_with(data: &str) -> RamFs {
    RamFs::new("ramfs", MountOptions::parse(data).unwrap(), clock())
}

fn read_all(fs: &RamFs, path: &str) -> Vec<u8> {
    let mut buf = vec![0u8; 16 * 1024];
    let n = fs.read(path, 0, &mut buf).unwrap();
    buf.truncate(n);
    buf
}

fn names(fs: &RamFs, path: &str) -> Vec<String> {
    fs.readdir(path).unwrap().into_iter().map(|e| e.name).collect()
}

fn assert_dense(fs: &RamFs) {
    let ids: Vec<u32> = fs.inode_ids().into_iter().map(|(id, _)| id).collect();
    let expected: Vec<u32> = (0..ids.len() as u32).collect();
    assert_eq!(ids, expected);
    assert_eq!(fs.superblock().total_inodes as usize, ids.len());
}

#[test]
fn create_with_initial_content() {
    let fs = mount();
    fs.create("/a.txt=hello", 0o644).unwrap();

    let attr = fs.getattr("/a.txt").unwrap();
    assert_eq!(attr.file_type, FileType::File);
    assert_eq!(attr.size, 6);
    assert_eq!(attr.blocks, 1);

    let mut buf = [0u8; 100];
    let n = fs.read("/a.txt", 0, &mut buf).unwrap();
    assert_eq!(&buf[..n], b"hello\n");
    assert_eq!(fs.superblock().free_blocks, 1023);
}

#[test]
fn create_plain_file_in_subdirectory() {
    let fs = mount();
    fs.mkdir("/d").unwrap();
    fs.create("/d/b.txt", 0o644).unwrap();

    assert_eq!(fs.getattr("/d/b.txt").unwrap().size, 0);
    assert!(read_all(&fs, "/d/b.txt").is_empty());

    let listed = names(&fs, "/d");
    assert!(listed.contains(&"b.txt".to_string()));
    assert_eq!(&listed[..3], [".", "..", "superblock"]);
}

#[test]
fn unlink_renumbers_later_inodes() {
    let fs = mount();
    fs.create("/a.txt=hello", 0o644).unwrap();
    fs.mkdir("/d").unwrap();
    assert_eq!(fs.inode_id("/d"), Ok(2));

    fs.unlink("/a.txt").unwrap();
    assert_eq!(fs.inode_id("/d"), Ok(1));
    assert_eq!(fs.inode_ids(), [(0, "/".to_string()), (1, "d".to_string())]);
    assert_eq!(fs.lookup_id(1).map(|(name, _)| name), Some("d".to_string()));
    assert!(fs.lookup_id(2).is_none());
}

#[test]
fn write_is_clipped_to_one_block() {
    let fs = mount();
    fs.mkdir("/d").unwrap();
    fs.create("/d/b.txt", 0o644).unwrap();

    let data = vec![b'x'; 5000];
    assert_eq!(fs.write("/d/b.txt", 0, &data), Ok(4096));
    assert_eq!(fs.getattr("/d/b.txt").unwrap().size, 4096);
    assert_eq!(read_all(&fs, "/d/b.txt"), vec![b'x'; 4096]);
}

#[test]
fn rmdir_non_empty_leaves_tree_unchanged() {
    let fs = mount();
    fs.mkdir("/d").unwrap();
    fs.create("/d/b.txt", 0o644).unwrap();
    let before = fs.report();

    assert_eq!(fs.rmdir("/d"), Err(FsError::DirectoryNotEmpty));
    assert_eq!(fs.report(), before);
    assert!(names(&fs, "/d").contains(&"b.txt".to_string()));
}

#[test]
fn exhausted_blocks_reject_create_without_side_effects() {
    let fs = mount_with("blocks=3");
    for i in 0..3 {
        fs.create(&format!("/f{}.txt", i), 0o644).unwrap();
    }
    assert_eq!(fs.superblock().free_blocks, 0);
    let before = fs.superblock();

    assert_eq!(fs.create("/x.txt", 0o644), Err(FsError::NoSpace));
    assert_eq!(fs.getattr("/x.txt"), Err(FsError::NotFound));
    assert_eq!(fs.superblock(), before);
    assert_eq!(fs.inode_ids().len(), 4);

    // Directories need no block.
    fs.mkdir("/still-ok").unwrap();
}

#[test]
fn unlink_releases_block_for_reuse() {
    let fs = mount_with("blocks=1");
    fs.create("/a", 0o644).unwrap();
    assert_eq!(fs.create("/b", 0o644), Err(FsError::NoSpace));

    fs.unlink("/a").unwrap();
    assert_eq!(fs.superblock().free_blocks, 1);
    fs.create("/b", 0o644).unwrap();
}

#[test]
fn unlink_then_lookups_fail() {
    let fs = mount();
    fs.create("/a.txt=hello", 0o644).unwrap();
    fs.unlink("/a.txt").unwrap();

    let mut buf = [0u8; 8];
    assert_eq!(fs.read("/a.txt", 0, &mut buf), Err(FsError::NotFound));
    assert_eq!(fs.getattr("/a.txt"), Err(FsError::NotFound));
    assert_eq!(fs.open("/a.txt"), Err(FsError::NotFound));
    assert!(!names(&fs, "/").contains(&"a.txt".to_string()));
}

#[test]
fn duplicate_names_are_rejected() {
    let fs = mount();
    fs.create("/a=one", 0o644).unwrap();
    assert_eq!(fs.create("/a=two", 0o644), Err(FsError::AlreadyExists));
    assert_eq!(fs.mkdir("/a"), Err(FsError::AlreadyExists));
    assert_eq!(read_all(&fs, "/a"), b"one\n");

    fs.mkdir("/d").unwrap();
    assert_eq!(fs.create("/d", 0o644), Err(FsError::AlreadyExists));
    assert_eq!(fs.superblock().free_blocks, 1023);
}

#[test]
fn missing_or_file_parent_is_not_found() {
    let fs = mount();
    fs.create("/f", 0o644).unwrap();
    assert_eq!(fs.create("/nope/a", 0o644), Err(FsError::NotFound));
    assert_eq!(fs.create("/f/a", 0o644), Err(FsError::NotFound));
    assert_eq!(fs.mkdir("/nope/d"), Err(FsError::NotFound));
    assert_eq!(fs.mkdir("/f/d"), Err(FsError::NotFound));
}

#[test]
fn empty_names_are_invalid() {
    let fs = mount();
    assert_eq!(fs.create("/=content", 0o644), Err(FsError::InvalidPath));
    assert_eq!(fs.mkdir("/"), Err(FsError::InvalidPath));
}

#[test]
fn superblock_name_is_reserved_at_root_only() {
    let fs = mount();
    assert_eq!(fs.create("/superblock", 0o644), Err(FsError::AlreadyExists));
    assert_eq!(fs.mkdir("/superblock"), Err(FsError::AlreadyExists));

    fs.mkdir("/d").unwrap();
    fs.create("/d/superblock=inner", 0o644).unwrap();
    assert_eq!(read_all(&fs, "/d/superblock"), b"inner\n");
}

#[test]
fn removal_errors() {
    let fs = mount();
    fs.create("/f", 0o644).unwrap();
    fs.mkdir("/d").unwrap();

    assert_eq!(fs.unlink("/d"), Err(FsError::NotFound));
    assert_eq!(fs.unlink("/missing"), Err(FsError::NotFound));
    assert_eq!(fs.unlink("/superblock"), Err(FsError::NotFound));
    assert_eq!(fs.rmdir("/f"), Err(FsError::NotADirectory));
    assert_eq!(fs.rmdir("/missing"), Err(FsError::NotADirectory));
    assert_eq!(fs.rmdir("/superblock"), Err(FsError::NotADirectory));

    fs.rmdir("/d").unwrap();
    assert_eq!(fs.getattr("/d"), Err(FsError::NotFound));
}

#[test]
fn rmdir_root() {
    let fs = mount();
    assert_eq!(fs.rmdir("/"), Err(FsError::NotFound));
    fs.mkdir("/d").unwrap();
    assert_eq!(fs.rmdir("/"), Err(FsError::DirectoryNotEmpty));
}

#[test]
fn initial_content_is_clamped_and_newline_terminated() {
    let fs = mount_with("block_size=8");
    fs.create("/long=abcdefghij", 0o644).unwrap();
    assert_eq!(read_all(&fs, "/long"), b"abcdefg\n");

    fs.create("/nl=hi\n", 0o644).unwrap();
    assert_eq!(read_all(&fs, "/nl"), b"hi\n");

    fs.create("/eq=a=b", 0o644).unwrap();
    assert_eq!(read_all(&fs, "/eq"), b"a=b\n");

    fs.create("/empty=", 0o644).unwrap();
    assert_eq!(read_all(&fs, "/empty"), b"\n");
}

#[test]
fn read_honors_offset_and_length() {
    let fs = mount();
    fs.create("/a=hello world", 0o644).unwrap();

    let mut buf = [0u8; 5];
    assert_eq!(fs.read("/a", 6, &mut buf), Ok(5));
    assert_eq!(&buf, b"world");

    let mut buf = [0u8; 100];
    assert_eq!(fs.read("/a", 10, &mut buf), Ok(2));
    assert_eq!(&buf[..2], b"d\n");
    assert_eq!(fs.read("/a", 12, &mut buf), Ok(0));
    assert_eq!(fs.read("/a", 1000, &mut buf), Ok(0));
}

#[test]
fn write_past_end_zero_fills_gap() {
    let fs = mount();
    fs.create("/f", 0o644).unwrap();
    assert_eq!(fs.write("/f", 4, b"ab"), Ok(2));
    assert_eq!(fs.getattr("/f").unwrap().size, 6);
    assert_eq!(read_all(&fs, "/f"), b"\0\0\0\0ab");

    // Overwrite inside the file keeps the size.
    assert_eq!(fs.write("/f", 0, b"xy"), Ok(2));
    assert_eq!(read_all(&fs, "/f"), b"xy\0\0ab");
}

#[test]
fn write_at_block_boundary_accepts_nothing() {
    let fs = mount_with("block_size=16");
    fs.create("/f", 0o644).unwrap();
    assert_eq!(fs.write("/f", 16, b"late"), Ok(0));
    assert_eq!(fs.write("/f", 14, b"late"), Ok(2));
    assert_eq!(fs.getattr("/f").unwrap().size, 16);
}

#[test]
fn write_and_read_reject_non_files() {
    let fs = mount();
    fs.mkdir("/d").unwrap();
    let mut buf = [0u8; 4];
    assert_eq!(fs.write("/d", 0, b"x"), Err(FsError::NotFound));
    assert_eq!(fs.write("/missing", 0, b"x"), Err(FsError::NotFound));
    assert_eq!(fs.write("/superblock", 0, b"x"), Err(FsError::NotFound));
    assert_eq!(fs.read("/d", 0, &mut buf), Err(FsError::NotFound));
    assert_eq!(fs.read("/missing", 0, &mut buf), Err(FsError::NotFound));
}

#[test]
fn truncate_shrinks_and_zero_extends() {
    let fs = mount();
    fs.create("/f=abcdef", 0o644).unwrap();

    fs.truncate("/f", 2).unwrap();
    assert_eq!(read_all(&fs, "/f"), b"ab");
    fs.truncate("/f", 4).unwrap();
    assert_eq!(read_all(&fs, "/f"), b"ab\0\0");

    fs.truncate("/f", 1 << 20).unwrap();
    assert_eq!(fs.getattr("/f").unwrap().size, 4096);

    fs.mkdir("/d").unwrap();
    assert_eq!(fs.truncate("/d", 0), Err(FsError::NotFound));
    assert_eq!(fs.truncate("/missing", 0), Err(FsError::NotFound));
}

#[test]
fn stat_root_and_directories() {
    let fs = mount();
    let root = fs.getattr("/").unwrap();
    assert_eq!(root.file_type, FileType::Directory);
    assert_eq!(root.nlink, 2);
    assert_eq!(root.perm.to_string(), "rwxr-xr-x");

    fs.mkdir("/d").unwrap();
    let d = fs.getattr("/d").unwrap();
    assert_eq!(d.file_type, FileType::Directory);
    assert_eq!(d.nlink, 1);
    assert_eq!(d.created, Timestamp::new(2024, 1, 2, 3, 4, 5));
}

#[test]
fn readdir_errors_and_synthetic_entries() {
    let fs = mount();
    fs.create("/f", 0o644).unwrap();
    assert_eq!(fs.readdir("/missing"), Err(FsError::NotFound));
    assert_eq!(fs.readdir("/f"), Err(FsError::NotFound));

    let entries = fs.readdir("/").unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[2].name, "superblock");
    assert_eq!(entries[2].file_type, FileType::File);
    assert_eq!(entries[3].name, "f");
}

#[test]
fn open_and_utimens() {
    let fs = mount();
    fs.mkdir("/d").unwrap();
    assert_eq!(fs.open("/"), Ok(()));
    assert_eq!(fs.open("/d"), Ok(()));
    assert_eq!(fs.open("/superblock"), Ok(()));
    assert_eq!(fs.open("/missing"), Err(FsError::NotFound));

    let before = fs.getattr("/d").unwrap();
    assert_eq!(fs.utimens("/d"), Ok(()));
    assert_eq!(fs.utimens("/missing"), Ok(()));
    assert_eq!(fs.getattr("/d").unwrap(), before);
}

#[test]
fn resolution_does_not_descend_into_files() {
    let fs = mount();
    fs.create("/f", 0o644).unwrap();
    assert_eq!(fs.getattr("/f/anything"), Err(FsError::NotFound));
    assert_eq!(fs.getattr("//f"), fs.getattr("/f"));
}

#[test]
fn statfs_mirrors_accounting() {
    let fs = mount_with("blocks=10,block_size=512,inodes=20");
    fs.create("/a", 0o644).unwrap();
    let st = fs.statfs();
    assert_eq!(st.block_size, 512);
    assert_eq!(st.total_blocks, 10);
    assert_eq!(st.free_blocks, 9);
    assert_eq!(st.total_inodes, 2);
    assert_eq!(st.free_inodes, 18);
    assert_eq!(st.name_max, 255);
    assert_eq!(fs.name(), "ramfs");
}

#[test]
fn ids_stay_dense_across_mixed_operations() {
    let fs = mount();
    for i in 0..6 {
        fs.mkdir(&format!("/d{}", i)).unwrap();
        fs.create(&format!("/d{}/f=data", i), 0o644).unwrap();
    }
    assert_dense(&fs);

    for i in [4, 1, 5] {
        fs.unlink(&format!("/d{}/f", i)).unwrap();
        assert_dense(&fs);
        fs.rmdir(&format!("/d{}", i)).unwrap();
        assert_dense(&fs);
    }
    fs.create("/late=x", 0o644).unwrap();
    assert_dense(&fs);

    assert_eq!(fs.inode_ids()[0], (0, "/".to_string()));
    let sb = fs.superblock();
    assert_eq!(sb.free_inodes + sb.total_inodes, 100);
    assert_eq!(sb.free_blocks, 1024 - 4);
}

#[test]
fn inode_accounting_survives_exceeding_capacity() {
    let fs = mount_with("inodes=2");
    for i in 0..3 {
        fs.mkdir(&format!("/d{}", i)).unwrap();
    }
    let sb = fs.superblock();
    assert_eq!((sb.total_inodes, sb.free_inodes), (4, 0));

    fs.rmdir("/d0").unwrap();
    fs.rmdir("/d1").unwrap();
    let sb = fs.superblock();
    assert_eq!((sb.total_inodes, sb.free_inodes), (2, 0));

    fs.rmdir("/d2").unwrap();
    let sb = fs.superblock();
    assert_eq!(sb.total_inodes + sb.free_inodes, 2);
    assert_eq!((sb.total_inodes, sb.free_inodes), (1, 1));
    assert_eq!(fs.statfs().free_inodes, 1);
    assert!(fs.report().contains("Free inodes: 1\n"));
}
