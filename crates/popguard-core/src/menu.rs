//! Host menu command seam
//!
//! Userscript and extension hosts expose a single registration point
//! for menu commands. The blocker registers exactly one: the entry that
//! surfaces the trusted-domains editor. No menu UI lives in this repo.

pub type MenuAction = Box<dyn Fn() + Send + Sync>;

pub trait MenuHost {
    fn register_command(&mut self, label: &str, action: MenuAction);
}
