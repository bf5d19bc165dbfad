pub type CmdResult<T> = subpatch::Result<(T, i32)>;

pub mod patch;

pub(crate) fn run_json(args: patch::PatchArgs) -> (subpatch::Result<serde_json::Value>, i32) {
    crate::output::map_cmd_result_to_json(patch::run(args))
}
