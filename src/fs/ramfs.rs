use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use spin::Mutex;

use super::dentry::DirEntry;
use super::error::{FsError, FsResult};
use super::inode::{BlockRange, FileAttr, FileType, NodeData, NodeIndex, Permissions, RamNode};
use super::mount::{FileSystem, StatFs};
use super::options::MountOptions;
use super::path::{self, SUPERBLOCK_NAME};
use super::registry::InodeRegistry;
use super::report;
use super::superblock::Superblock;
use super::time::Clock;

const NAME_MAX: u32 = 255;

// ──────────────────────────────────────────────────────────────
//  Internal state, locked for the whole of each handler
// ──────────────────────────────────────────────────────────────

struct RamFsInner {
    sb: Superblock,
    registry: InodeRegistry,
    root: NodeIndex,
}

impl RamFsInner {
    fn new(opts: &MountOptions, clock: &dyn Clock) -> Self {
        let now = clock.now();
        let mut sb = Superblock::new(opts, now);
        let mut registry = InodeRegistry::new();

        let root = registry.insert(RamNode::new_dir("/", None, now));
        sb.allocate_inode_slot();

        RamFsInner { sb, registry, root }
    }

    fn node(&self, idx: NodeIndex) -> FsResult<&RamNode> {
        self.registry.get(idx).ok_or(FsError::NotFound)
    }

    fn resolve(&self, path: &str) -> FsResult<NodeIndex> {
        path::resolve(&self.registry, self.root, path).ok_or(FsError::NotFound)
    }

    /// Resolve the directory a new entry goes into and check that `name`
    /// is free there.
    fn prepare_insert(&self, dir_path: &str, name: &str) -> FsResult<NodeIndex> {
        if name.is_empty() || name == "." || name == ".." {
            return Err(FsError::InvalidPath);
        }

        let parent = self.resolve(dir_path)?;
        let dir = self.node(parent)?.as_dir().ok_or(FsError::NotFound)?;

        if dir.find_child(name).is_some() {
            return Err(FsError::AlreadyExists);
        }
        // Would be shadowed by the diagnostic file.
        if parent == self.root && name == SUPERBLOCK_NAME {
            return Err(FsError::AlreadyExists);
        }
        Ok(parent)
    }

    /// Register `node` and bind it under `parent`. Infallible once
    /// `prepare_insert` has succeeded.
    fn attach(&mut self, parent: NodeIndex, node: RamNode) -> NodeIndex {
        let name = node.name.clone();
        let idx = self.registry.insert(node);
        if let Some(dir) = self.registry.get_mut(parent).and_then(RamNode::as_dir_mut) {
            dir.add_child(&name, idx);
        }
        self.sb.allocate_inode_slot();
        debug_assert_eq!(self.registry.len(), self.sb.total_inodes as usize);
        idx
    }

    /// Unbind `idx` from its parent and drop it from the registry,
    /// renumbering every higher id.
    fn detach(&mut self, idx: NodeIndex) -> FsResult<RamNode> {
        let node = self.node(idx)?;
        let (id, name) = (node.id, node.name.clone());
        let parent = node.parent.ok_or(FsError::NotFound)?;

        let dir = self
            .registry
            .get_mut(parent)
            .and_then(RamNode::as_dir_mut)
            .ok_or(FsError::NotFound)?;
        if dir.find_child(&name) != Some(idx) {
            return Err(FsError::NotFound);
        }
        dir.remove_child(&name);

        let removed = self.registry.remove(id).ok_or(FsError::NotFound)?;
        self.sb.release_inode_slot();
        debug_assert_eq!(self.registry.len(), self.sb.total_inodes as usize);
        Ok(removed)
    }

    fn report(&self) -> String {
        report::render(&self.sb, &self.registry, self.root)
    }

    fn superblock_attr(&self) -> FileAttr {
        FileAttr {
            file_type: FileType::File,
            size: self.report().len(),
            perm: Permissions::READ_ONLY,
            nlink: 1,
            blocks: 0,
            created: self.sb.mounted_at,
        }
    }
}

/// Copy `src[offset..]` into `buf`, returning the number of bytes copied.
fn copy_from(src: &[u8], offset: usize, buf: &mut [u8]) -> usize {
    if offset >= src.len() {
        return 0;
    }
    let available = &src[offset..];
    let n = buf.len().min(available.len());
    buf[..n].copy_from_slice(&available[..n]);
    n
}

fn log_failure<T>(op: &str, path: &str, result: FsResult<T>) -> FsResult<T> {
    if let Err(e) = &result {
        log::debug!("ramfs: {} {}: {}", op, path, e);
    }
    result
}

// ──────────────────────────────────────────────────────────────
//  Public RamFs struct
// ──────────────────────────────────────────────────────────────

/// In-memory filesystem with one block per file and a live diagnostic
/// report at `/superblock`.
pub struct RamFs {
    label: &'static str,
    clock: Box<dyn Clock>,
    inner: Mutex<RamFsInner>,
}

impl RamFs {
    pub fn new(label: &'static str, opts: MountOptions, clock: impl Clock + 'static) -> Self {
        let inner = RamFsInner::new(&opts, &clock);
        log::info!(
            "ramfs: mounted '{}' ({} blocks of {} bytes, {} inodes)",
            label,
            opts.total_blocks,
            opts.block_size,
            opts.inode_capacity
        );
        RamFs {
            label,
            clock: Box::new(clock),
            inner: Mutex::new(inner),
        }
    }

    /// Render the diagnostic report as `/superblock` would read it.
    pub fn report(&self) -> String {
        self.inner.lock().report()
    }

    /// Snapshot of the accounting counters.
    pub fn superblock(&self) -> Superblock {
        self.inner.lock().sb
    }

    /// Current identifier of the node at `path`. Only valid until the next
    /// removal.
    pub fn inode_id(&self, path: &str) -> FsResult<u32> {
        let inner = self.inner.lock();
        let idx = inner.resolve(path)?;
        Ok(inner.node(idx)?.id)
    }

    /// Name and attributes of the node currently holding `id`.
    pub fn lookup_id(&self, id: u32) -> Option<(String, FileAttr)> {
        let inner = self.inner.lock();
        inner
            .registry
            .lookup_by_id(id)
            .map(|n| (n.name.clone(), n.to_attr()))
    }

    /// `(id, name)` of every registered node, ascending by id.
    pub fn inode_ids(&self) -> Vec<(u32, String)> {
        let inner = self.inner.lock();
        inner
            .registry
            .enumerate_all()
            .map(|n| (n.id, n.name.clone()))
            .collect()
    }

    fn create_file(&self, path: &str) -> FsResult<()> {
        let (dir_path, base) = path::split_path(path);
        let (name, initial) = path::split_initial_content(base);

        let mut inner = self.inner.lock();
        let parent = inner.prepare_insert(dir_path, name)?;
        let start = inner.sb.allocate_block().map_err(|e| {
            log::warn!("ramfs: no free block for {}", path);
            e
        })?;

        let block_size = inner.sb.block_size as usize;
        let mut content = vec![0u8; block_size];
        let mut size = 0;
        if let Some(text) = initial {
            let bytes = text.as_bytes();
            let len = bytes.len().min(block_size.saturating_sub(1));
            content[..len].copy_from_slice(&bytes[..len]);
            size = len;
            if (len == 0 || bytes[len - 1] != b'\n') && len < block_size {
                content[len] = b'\n';
                size += 1;
            }
        }

        let mut node = RamNode::new_file(name, initial, parent, self.clock.now());
        node.blocks = BlockRange { start: Some(start), count: 1 };
        node.size = size;
        if let Some(file) = node.as_file_mut() {
            file.content = Some(content);
        }
        inner.attach(parent, node);

        log::debug!("ramfs: create {} ({} bytes, block {})", path, size, start);
        Ok(())
    }

    fn make_dir(&self, path: &str) -> FsResult<()> {
        let (dir_path, name) = path::split_path(path);

        let mut inner = self.inner.lock();
        let parent = inner.prepare_insert(dir_path, name)?;
        let node = RamNode::new_dir(name, Some(parent), self.clock.now());
        inner.attach(parent, node);

        log::debug!("ramfs: mkdir {}", path);
        Ok(())
    }

    fn remove_dir(&self, path: &str) -> FsResult<()> {
        let mut inner = self.inner.lock();
        let idx = inner.resolve(path).map_err(|_| FsError::NotADirectory)?;
        let node = inner.node(idx)?;
        let dir = node.as_dir().ok_or(FsError::NotADirectory)?;
        if !dir.is_empty() {
            return Err(FsError::DirectoryNotEmpty);
        }
        if node.parent.is_none() {
            return Err(FsError::NotFound);
        }

        let removed = inner.detach(idx)?;
        log::debug!("ramfs: rmdir {} (inode {})", path, removed.id);
        Ok(())
    }

    fn remove_file(&self, path: &str) -> FsResult<()> {
        let mut inner = self.inner.lock();
        let idx = inner.resolve(path)?;
        if inner.node(idx)?.file_type() != FileType::File {
            return Err(FsError::NotFound);
        }

        let removed = inner.detach(idx)?;
        inner.sb.release_blocks(removed.blocks.count);
        log::debug!("ramfs: unlink {} (inode {}, {} blocks released)", path, removed.id, removed.blocks.count);
        Ok(())
    }

    fn read_at(&self, path: &str, offset: usize, buf: &mut [u8]) -> FsResult<usize> {
        let inner = self.inner.lock();
        if path::is_superblock(path) {
            let text = inner.report();
            return Ok(copy_from(text.as_bytes(), offset, buf));
        }

        let node = inner.node(inner.resolve(path)?)?;
        match &node.data {
            NodeData::File(file) => {
                let content = file.content.as_deref().unwrap_or(&[]);
                let end = node.size.min(content.len());
                Ok(copy_from(&content[..end], offset, buf))
            }
            NodeData::Directory(_) => Err(FsError::NotFound),
        }
    }

    fn write_at(&self, path: &str, offset: usize, data: &[u8]) -> FsResult<usize> {
        let mut guard = self.inner.lock();
        let idx = guard.resolve(path)?;
        let RamFsInner { sb, registry, .. } = &mut *guard;

        let node = registry.get_mut(idx).ok_or(FsError::NotFound)?;
        let block_size = sb.block_size as usize;
        let blocks = &mut node.blocks;
        let file = match &mut node.data {
            NodeData::File(file) => file,
            NodeData::Directory(_) => return Err(FsError::NotFound),
        };

        if file.content.is_none() {
            let start = sb.allocate_block()?;
            *blocks = BlockRange { start: Some(start), count: 1 };
            file.content = Some(vec![0u8; block_size]);
        }
        let content = match file.content.as_mut() {
            Some(content) => content,
            None => return Err(FsError::NotFound),
        };

        if offset >= block_size {
            return Ok(0);
        }
        let n = data.len().min(block_size - offset);
        content[offset..offset + n].copy_from_slice(&data[..n]);
        if n > 0 && offset + n > node.size {
            node.size = offset + n;
        }

        log::debug!("ramfs: write {} ({} of {} bytes at {})", path, n, data.len(), offset);
        Ok(n)
    }

    fn set_size(&self, path: &str, size: usize) -> FsResult<()> {
        let mut guard = self.inner.lock();
        let idx = guard.resolve(path)?;
        let RamFsInner { sb, registry, .. } = &mut *guard;

        let node = registry.get_mut(idx).ok_or(FsError::NotFound)?;
        let block_size = sb.block_size as usize;
        let size = size.min(block_size);
        let blocks = &mut node.blocks;
        let file = match &mut node.data {
            NodeData::File(file) => file,
            NodeData::Directory(_) => return Err(FsError::NotFound),
        };

        if file.content.is_none() && size > 0 {
            let start = sb.allocate_block()?;
            *blocks = BlockRange { start: Some(start), count: 1 };
            file.content = Some(vec![0u8; block_size]);
        }
        // Bytes past the end stay zeroed so a later extension reads zeros.
        if let Some(content) = file.content.as_mut() {
            if size < node.size {
                content[size..node.size].fill(0);
            }
        }
        node.size = size;

        log::debug!("ramfs: truncate {} to {}", path, size);
        Ok(())
    }
}

// ──────────────────────────────────────────────────────────────
//  FileSystem trait implementation
// ──────────────────────────────────────────────────────────────

impl FileSystem for RamFs {
    fn name(&self) -> &str {
        self.label
    }

    fn getattr(&self, path: &str) -> FsResult<FileAttr> {
        let inner = self.inner.lock();
        if path::is_superblock(path) {
            return Ok(inner.superblock_attr());
        }
        let idx = inner.resolve(path)?;
        Ok(inner.node(idx)?.to_attr())
    }

    fn readdir(&self, path: &str) -> FsResult<Vec<DirEntry>> {
        let inner = self.inner.lock();
        let idx = log_failure("readdir", path, inner.resolve(path))?;
        let dir = inner.node(idx)?.as_dir().ok_or(FsError::NotFound)?;

        let mut entries = Vec::with_capacity(dir.len() + 3);
        for (name, file_type) in [
            (".", FileType::Directory),
            ("..", FileType::Directory),
            (SUPERBLOCK_NAME, FileType::File),
        ] {
            entries.push(DirEntry { name: String::from(name), file_type });
        }
        for (name, child) in dir.iter() {
            if let Some(node) = inner.registry.get(child) {
                entries.push(DirEntry {
                    name: String::from(name),
                    file_type: node.file_type(),
                });
            }
        }
        Ok(entries)
    }

    fn create(&self, path: &str, _mode: u32) -> FsResult<()> {
        log_failure("create", path, self.create_file(path))
    }

    fn mkdir(&self, path: &str) -> FsResult<()> {
        log_failure("mkdir", path, self.make_dir(path))
    }

    fn rmdir(&self, path: &str) -> FsResult<()> {
        log_failure("rmdir", path, self.remove_dir(path))
    }

    fn unlink(&self, path: &str) -> FsResult<()> {
        log_failure("unlink", path, self.remove_file(path))
    }

    fn read(&self, path: &str, offset: usize, buf: &mut [u8]) -> FsResult<usize> {
        log_failure("read", path, self.read_at(path, offset, buf))
    }

    fn write(&self, path: &str, offset: usize, data: &[u8]) -> FsResult<usize> {
        log_failure("write", path, self.write_at(path, offset, data))
    }

    fn open(&self, path: &str) -> FsResult<()> {
        if path::is_superblock(path) {
            return Ok(());
        }
        let inner = self.inner.lock();
        log_failure("open", path, inner.resolve(path).map(|_| ()))
    }

    fn utimens(&self, path: &str) -> FsResult<()> {
        log::trace!("ramfs: utimens {} ignored", path);
        Ok(())
    }

    fn truncate(&self, path: &str, size: usize) -> FsResult<()> {
        log_failure("truncate", path, self.set_size(path, size))
    }

    fn statfs(&self) -> StatFs {
        let sb = self.inner.lock().sb;
        StatFs {
            block_size: sb.block_size,
            total_blocks: sb.total_blocks,
            free_blocks: sb.free_blocks,
            total_inodes: sb.total_inodes,
            free_inodes: sb.free_inodes,
            name_max: NAME_MAX,
        }
    }
}
