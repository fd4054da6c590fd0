//! Hook-processor strategies for recognized hook libraries.
//!
//! Each processor handles one hook family; the builder asks them in order
//! and the first match wins. A processor failure is caught at the
//! processing boundary and the hook falls back to the generic creation
//! path, so one bad record never aborts a build. Processors are plain
//! values injected into the builder, not global registry state.

use crate::analysis::{HookCategory, HookInfo, VarKind};
use crate::error::{Result, UiflowError};

use super::types::{NodeArena, NodeDetail, NodeKind};

/// Handles node creation for one recognized hook family.
pub trait HookProcessor {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Whether this processor recognizes the hook record.
    fn matches(&self, hook: &HookInfo) -> bool;

    /// Create the hook's nodes in the arena.
    fn process(&self, hook: &HookInfo, arena: &mut NodeArena) -> Result<()>;
}

/// The default processor set, in match order.
pub fn default_processors() -> Vec<Box<dyn HookProcessor>> {
    vec![
        Box::new(DataFetchingProcessor),
        Box::new(StateManagementProcessor),
        Box::new(FormProcessor),
        Box::new(RoutingProcessor),
        Box::new(ServerActionProcessor),
    ]
}

/// Primary display label for a hook's node: first bound variable, or the
/// hook name with the `use` prefix stripped.
fn hook_label(hook: &HookInfo) -> String {
    if let Some(first) = hook.variables.first() {
        return first.clone();
    }
    let name = hook.hook_name.as_str();
    match name.strip_prefix("use") {
        Some(rest) if !rest.is_empty() => {
            let mut chars = rest.chars();
            let head = chars.next().map(|c| c.to_lowercase().to_string());
            format!("{}{}", head.unwrap_or_default(), chars.as_str())
        }
        _ => name.to_string(),
    }
}

/// Split a hook's exposed names into data and process lists, preferring
/// the adapter-provided lists, then per-variable types, then data-only.
fn split_properties(hook: &HookInfo) -> (Vec<String>, Vec<String>) {
    if !hook.data_properties.is_empty() || !hook.process_properties.is_empty() {
        return (
            hook.data_properties.clone(),
            hook.process_properties.clone(),
        );
    }
    if !hook.variable_types.is_empty() {
        let mut data = Vec::new();
        let mut process = Vec::new();
        for var in &hook.variables {
            match hook.variable_types.get(var) {
                Some(VarKind::Function) => process.push(var.clone()),
                _ => data.push(var.clone()),
            }
        }
        return (data, process);
    }
    (hook.variables.clone(), Vec::new())
}

fn library_detail(hook: &HookInfo) -> NodeDetail {
    let (data_properties, process_properties) = split_properties(hook);
    NodeDetail::LibraryHook {
        library: hook
            .library_name
            .clone()
            .unwrap_or_else(|| hook.hook_name.clone()),
        data_properties,
        process_properties,
    }
}

fn require_exposed_names(hook: &HookInfo) -> Result<()> {
    if hook.variables.is_empty()
        && hook.data_properties.is_empty()
        && hook.process_properties.is_empty()
    {
        return Err(UiflowError::HookProcessing {
            hook: hook.hook_name.clone(),
            reason: "hook exposes no names".to_string(),
        });
    }
    Ok(())
}

fn matches_category_or_name(
    hook: &HookInfo,
    category: HookCategory,
    names: &[&str],
) -> bool {
    hook.category == Some(category) || names.contains(&hook.hook_name.as_str())
}

/// Data-fetching hooks (react-query, SWR, `useFetch`): fetched data
/// enters the component, so the node is an external input.
pub struct DataFetchingProcessor;

impl HookProcessor for DataFetchingProcessor {
    fn name(&self) -> &'static str {
        "data-fetching"
    }

    fn matches(&self, hook: &HookInfo) -> bool {
        matches_category_or_name(
            hook,
            HookCategory::DataFetching,
            &["useQuery", "useMutation", "useSWR", "useFetch", "useAsyncData"],
        )
    }

    fn process(&self, hook: &HookInfo, arena: &mut NodeArena) -> Result<()> {
        require_exposed_names(hook)?;
        arena.add_unique(
            hook_label(hook),
            NodeKind::ExternalInput,
            library_detail(hook),
            hook.line,
            hook.column,
        );
        Ok(())
    }
}

/// Store-subscription hooks (redux `useSelector`, zustand `useStore`).
pub struct StateManagementProcessor;

impl HookProcessor for StateManagementProcessor {
    fn name(&self) -> &'static str {
        "state-management"
    }

    fn matches(&self, hook: &HookInfo) -> bool {
        matches_category_or_name(
            hook,
            HookCategory::StateManagement,
            &["useSelector", "useStore", "useAtom", "useRecoilState"],
        )
    }

    fn process(&self, hook: &HookInfo, arena: &mut NodeArena) -> Result<()> {
        require_exposed_names(hook)?;
        arena.add_unique(
            hook_label(hook),
            NodeKind::DataStore,
            library_detail(hook),
            hook.line,
            hook.column,
        );
        Ok(())
    }
}

/// Form hooks (`useForm`): held form state plus callable register/submit.
pub struct FormProcessor;

impl HookProcessor for FormProcessor {
    fn name(&self) -> &'static str {
        "form"
    }

    fn matches(&self, hook: &HookInfo) -> bool {
        matches_category_or_name(hook, HookCategory::Form, &["useForm", "useFormContext"])
    }

    fn process(&self, hook: &HookInfo, arena: &mut NodeArena) -> Result<()> {
        require_exposed_names(hook)?;
        arena.add_unique(
            hook_label(hook),
            NodeKind::DataStore,
            library_detail(hook),
            hook.line,
            hook.column,
        );
        Ok(())
    }
}

/// Routing hooks: navigation calls leave the component; route params come
/// in as data. Data-less routers become external outputs.
pub struct RoutingProcessor;

impl HookProcessor for RoutingProcessor {
    fn name(&self) -> &'static str {
        "routing"
    }

    fn matches(&self, hook: &HookInfo) -> bool {
        matches_category_or_name(
            hook,
            HookCategory::Routing,
            &[
                "useRouter",
                "useNavigate",
                "useRoute",
                "useParams",
                "useLocation",
                "useSearchParams",
            ],
        )
    }

    fn process(&self, hook: &HookInfo, arena: &mut NodeArena) -> Result<()> {
        require_exposed_names(hook)?;
        let detail = library_detail(hook);
        let kind = match &detail {
            NodeDetail::LibraryHook {
                data_properties, ..
            } if data_properties.is_empty() => NodeKind::ExternalOutput,
            _ => NodeKind::DataStore,
        };
        arena.add_unique(hook_label(hook), kind, detail, hook.line, hook.column);
        Ok(())
    }
}

/// Server-action hooks (`useActionState`, `useFormState`): the action is
/// invoked by the component, so the node is an external output.
pub struct ServerActionProcessor;

impl HookProcessor for ServerActionProcessor {
    fn name(&self) -> &'static str {
        "server-action"
    }

    fn matches(&self, hook: &HookInfo) -> bool {
        matches_category_or_name(
            hook,
            HookCategory::ServerAction,
            &["useActionState", "useFormState"],
        )
    }

    fn process(&self, hook: &HookInfo, arena: &mut NodeArena) -> Result<()> {
        require_exposed_names(hook)?;
        arena.add_unique(
            hook_label(hook),
            NodeKind::ExternalOutput,
            library_detail(hook),
            hook.line,
            hook.column,
        );
        Ok(())
    }
}
