// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::cell::Cell;
use core::iter::FusedIterator;
use core::marker::{PhantomData, PhantomPinned};
use core::mem::MaybeUninit;
use core::pin::Pin;
use core::ptr::NonNull;

use moveit::{new, MoveNew, MoveRef, New};

use super::header::{LlHeader, LlLink};
use super::raw;
use super::traits::LinkedList;
use crate::link::Link;
use crate::traits::{LinkElement, TypedLink};

/// A doubly linked list owning a chain of [`LlHeader`]s.
///
/// The list only caches the first and last node of the chain.
/// The outermost links of the chain point back to the list, so the cache stays current no matter
/// whether nodes are linked and detached through the list, through [`raw`] or by dropping them.
///
/// Elements must stay at a stable address as long as they are linked.
/// As the Rust compiler cannot guarantee that for an arbitrary element type, all functions that
/// take or return element references are `unsafe`.
/// [`LlNode`] elements can additionally be linked through their own safe functions.
///
/// Dropping the list (or calling [`clear`]) only cuts the links between the list and its outermost
/// nodes. The nodes stay linked to each other as a chain without a list.
///
/// [`clear`]: Self::clear
/// [`LlNode`]: crate::list::LlNode
pub struct LlList<E, L> {
    pub(crate) first: Cell<Option<NonNull<LlHeader<E, L>>>>,
    pub(crate) last: Cell<Option<NonNull<LlHeader<E, L>>>>,
    pin: PhantomPinned,
}

impl<E, L> LlList<E, L> {
    fn empty() -> Self {
        Self {
            first: Cell::new(None),
            last: Cell::new(None),
            pin: PhantomPinned,
        }
    }

    fn as_link(&self) -> LlLink<E, L> {
        Link::Container(NonNull::from(self))
    }

    /// Returns what comes after the list start: the first node, or the list itself if it is empty.
    fn first_link(&self) -> LlLink<E, L> {
        self.first.get().map_or(self.as_link(), Link::Node)
    }

    /// Returns what comes before the list end: the last node, or the list itself if it is empty.
    fn last_link(&self) -> LlLink<E, L> {
        self.last.get().map_or(self.as_link(), Link::Node)
    }

    fn first_node<'a>(&self) -> Option<&'a LlHeader<E, L>> {
        self.first.get().map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    fn last_node<'a>(&self) -> Option<&'a LlHeader<E, L>> {
        self.last.get().map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    /// Cuts the links between the list and its outermost nodes and returns those nodes.
    ///
    /// The nodes then form a chain of their own.
    fn release<'a>(&self) -> Option<(&'a LlHeader<E, L>, &'a LlHeader<E, L>)> {
        let first = self.first_node()?;
        let last = self.last_node()?;

        first.prev.set(Link::Empty);
        last.next.set(Link::Empty);
        self.first.set(None);
        self.last.set(None);

        Some((first, last))
    }

    /// Releases our own nodes and takes over the nodes of `other`.
    fn take_links(&self, other: &Self) {
        self.release();

        if let Some((first, last)) = other.release() {
            unsafe { raw::splice(self.as_link(), self.as_link(), first, last) }
        }
    }

    /// Moves all elements from `other` to the end of the list.
    ///
    /// This reuses all the nodes from `other` and moves them into `self`.
    /// After this operation, `other` becomes empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub fn append(self: Pin<&mut Self>, other: Pin<&mut Self>) {
        let this = self.into_ref().get_ref();

        if let Some((first, last)) = other.into_ref().get_ref().release() {
            unsafe { raw::splice(this.last_link(), this.as_link(), first, last) }
        }
    }

    /// Removes all elements from the list.
    ///
    /// The elements stay linked to each other as a bare chain, only the links to the list are cut.
    ///
    /// This operation computes in *O*(*1*) time.
    pub fn clear(self: Pin<&mut Self>) {
        self.into_ref().get_ref().release();
    }

    /// Returns `true` if the list is empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub fn is_empty(self: Pin<&Self>) -> bool {
        self.first.get().is_none()
    }

    /// Counts all elements and returns the length of the list.
    ///
    /// This operation computes in *O*(*n*) time.
    pub fn len(self: Pin<&Self>) -> usize {
        let mut count = 0;
        let mut current = self.first_node();

        while let Some(header) = current {
            count += 1;
            current = header.next_node();
        }

        count
    }

    /// Reverses the order of all elements.
    ///
    /// This operation computes in *O*(*n*) time.
    pub fn reverse(self: Pin<&mut Self>) {
        if let (Some(first), Some(last)) = (self.first_node(), self.last_node()) {
            unsafe {
                raw::range_reverse(first, last);
            }
        }
    }

    /// Drops our own elements (see [`clear`](Self::clear)) and moves all elements of `other` into
    /// this list. After this operation, `other` becomes empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub fn take_from(self: Pin<&mut Self>, other: Pin<&mut Self>) {
        self.into_ref()
            .get_ref()
            .take_links(other.into_ref().get_ref());
    }
}

impl<E, L> LlList<E, L>
where
    E: LinkElement<L>,
    L: TypedLink<T = LinkedList>,
{
    /// Creates a new empty doubly linked list.
    pub fn new() -> impl New<Output = Self> {
        new::of(Self::empty())
    }

    /// Creates a new doubly linked list out of the given elements, keeping their order.
    ///
    /// # Safety
    ///
    /// All elements must be detached and must stay at their address as long as they are linked.
    pub unsafe fn from_nodes<'a, I>(elements: I) -> impl New<Output = Self> + 'a
    where
        I: IntoIterator<Item = &'a E> + 'a,
        E: 'a,
        L: 'a,
    {
        Self::new().with(move |this| {
            let this = this.into_ref().get_ref();

            for element in elements {
                let header = LlHeader::of(element);
                zll_assert!(header.is_detached());
                raw::splice(this.last_link(), this.as_link(), header, header);
            }
        })
    }

    /// Provides a reference to the last element, or `None` if the list is empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub unsafe fn back(self: Pin<&Self>) -> Option<&E> {
        self.last_node().map(|header| header.containing_record())
    }

    /// Removes the last element from the list and returns it, or `None` if the list is empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub unsafe fn detach_back(self: Pin<&mut Self>) -> Option<&E> {
        self.last_node().map(|header| {
            raw::detach(header);
            header.containing_record()
        })
    }

    /// Removes the first element from the list and returns it, or `None` if the list is empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub unsafe fn detach_front(self: Pin<&mut Self>) -> Option<&E> {
        self.first_node().map(|header| {
            raw::detach(header);
            header.containing_record()
        })
    }

    /// Provides a reference to the first element, or `None` if the list is empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub unsafe fn front(self: Pin<&Self>) -> Option<&E> {
        self.first_node().map(|header| header.containing_record())
    }

    /// Returns an iterator yielding references to each element of the list.
    pub unsafe fn iter(self: Pin<&Self>) -> Iter<'_, E, L> {
        Iter {
            flink: self.first.get(),
            blink: self.last.get(),
            marker: PhantomData,
        }
    }

    /// Returns an iterator yielding references to `element` and all elements following it.
    ///
    /// `element` must be linked into this list.
    pub unsafe fn iter_from(self: Pin<&Self>, element: &E) -> Iter<'_, E, L> {
        Iter {
            flink: Some(NonNull::from(LlHeader::of(element))),
            blink: self.last.get(),
            marker: PhantomData,
        }
    }

    /// Returns an iterator yielding pinned mutable references to each element of the list.
    pub unsafe fn iter_mut(self: Pin<&mut Self>) -> IterMut<'_, E, L> {
        IterMut {
            flink: self.first.get(),
            blink: self.last.get(),
            marker: PhantomData,
        }
    }

    /// Moves `element` to the end of the list.
    ///
    /// If `element` is linked anywhere else, it is detached from there first.
    ///
    /// This operation computes in *O*(*1*) time.
    pub unsafe fn link_back(self: Pin<&mut Self>, element: &E) {
        let this = self.into_ref().get_ref();
        let header = LlHeader::of(element);

        raw::detach(header);
        raw::splice(this.last_link(), this.as_link(), header, header);
    }

    /// Moves `element` to the front of the list.
    ///
    /// If `element` is linked anywhere else, it is detached from there first.
    ///
    /// This operation computes in *O*(*1*) time.
    pub unsafe fn link_front(self: Pin<&mut Self>, element: &E) {
        let this = self.into_ref().get_ref();
        let header = LlHeader::of(element);

        raw::detach(header);
        raw::splice(this.as_link(), this.first_link(), header, header);
    }

    /// Merges the elements of `other` into the list, using `PartialOrd` for comparison.
    ///
    /// See [`merge_by`](Self::merge_by) for details.
    pub unsafe fn merge(self: Pin<&mut Self>, other: Pin<&mut Self>)
    where
        E: PartialOrd,
    {
        self.merge_by(other, |a, b| a < b);
    }

    /// Merges the elements of `other` into the list.
    ///
    /// Both lists must be sorted with respect to `less`.
    /// The merge is stable: of two equal elements, the one from `self` comes first.
    /// After this operation, `other` becomes empty.
    ///
    /// This operation computes in *O*(*n* + *m*) time.
    pub unsafe fn merge_by<F>(self: Pin<&mut Self>, other: Pin<&mut Self>, less: F)
    where
        F: FnMut(&E, &E) -> bool,
    {
        if other.as_ref().is_empty() {
            return;
        }

        match (self.first_node(), self.last_node()) {
            (Some(first), Some(last)) => {
                if let (Some(other_first), Some(other_last)) = (other.first_node(), other.last_node()) {
                    raw::merge_ranges(first, last, other_first, other_last, less);
                }
            }
            _ => self.take_from(other),
        }
    }

    /// Removes all elements comparing equal to `value` and returns their count.
    ///
    /// This operation computes in *O*(*n*) time.
    pub unsafe fn remove(self: Pin<&mut Self>, value: &E) -> usize
    where
        E: PartialEq,
    {
        self.remove_if(|element| element == value)
    }

    /// Removes all elements for which `pred` returns `true` and returns their count.
    ///
    /// This operation computes in *O*(*n*) time.
    pub unsafe fn remove_if<F>(self: Pin<&mut Self>, pred: F) -> usize
    where
        F: FnMut(&E) -> bool,
    {
        match (self.first_node(), self.last_node()) {
            (Some(first), Some(last)) => raw::range_remove(first, last, pred),
            _ => 0,
        }
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all elements `e` for which `f(&e)` returns `false`.
    /// This method operates in place, visiting each element exactly once in the original order,
    /// and preserves the order of the retained elements.
    ///
    /// This operation computes in *O*(*n*) time.
    pub unsafe fn retain<F>(self: Pin<&mut Self>, mut f: F)
    where
        F: FnMut(&E) -> bool,
    {
        self.remove_if(|element| !f(element));
    }

    /// Sorts the list, using `PartialOrd` for comparison.
    ///
    /// See [`sort_by`](Self::sort_by) for details.
    pub unsafe fn sort(self: Pin<&mut Self>)
    where
        E: PartialOrd,
    {
        self.sort_by(|a, b| a < b);
    }

    /// Sorts the list with respect to `less`.
    ///
    /// The sort is stable: equal elements keep their relative order.
    ///
    /// This operation computes in *O*(*n* log *n*) time on average.
    pub unsafe fn sort_by<F>(self: Pin<&mut Self>, less: F)
    where
        F: FnMut(&E, &E) -> bool,
    {
        if let (Some(first), Some(last)) = (self.first_node(), self.last_node()) {
            raw::range_qsort(first, last, less);
        }
    }

    /// Moves all elements from `other` into the list, right before `position`.
    ///
    /// If `position` is `None`, the elements are appended to the end of the list.
    /// Otherwise, `position` must be an element of this list.
    /// After this operation, `other` becomes empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub unsafe fn splice(self: Pin<&mut Self>, position: Option<&E>, other: Pin<&mut Self>) {
        match position {
            Some(position) => {
                if let Some((first, last)) = other.into_ref().get_ref().release() {
                    raw::link_range_as_prev(LlHeader::of(position), first, last);
                }
            }
            None => self.append(other),
        }
    }

    /// Removes consecutive elements comparing equal, using `PartialEq` for comparison.
    ///
    /// See [`unique_by`](Self::unique_by) for details.
    pub unsafe fn unique(self: Pin<&mut Self>) -> usize
    where
        E: PartialEq,
    {
        self.unique_by(|a, b| a == b)
    }

    /// Removes every element for which `eq` returns `true` when called with the closest preceding
    /// element that stays and the element itself.
    ///
    /// Only the first element of each group of consecutive equal elements stays.
    /// Returns the number of removed elements.
    ///
    /// This operation computes in *O*(*n*) time.
    pub unsafe fn unique_by<F>(self: Pin<&mut Self>, eq: F) -> usize
    where
        F: FnMut(&E, &E) -> bool,
    {
        match (self.first_node(), self.last_node()) {
            (Some(first), Some(last)) => raw::range_unique(first, last, eq),
            _ => 0,
        }
    }
}

impl<E, L> Drop for LlList<E, L> {
    fn drop(&mut self) {
        self.release();
    }
}

unsafe impl<E, L> MoveNew for LlList<E, L> {
    unsafe fn move_new(src: Pin<MoveRef<'_, Self>>, this: Pin<&mut MaybeUninit<Self>>) {
        let this = this.get_unchecked_mut().write(Self::empty());
        this.take_links(&src);
    }
}

/// Iterator over the elements of a doubly linked list.
///
/// This iterator is returned from the [`LlList::iter`] and [`LlList::iter_from`] functions.
pub struct Iter<'a, E, L> {
    flink: Option<NonNull<LlHeader<E, L>>>,
    blink: Option<NonNull<LlHeader<E, L>>>,
    marker: PhantomData<&'a LlList<E, L>>,
}

impl<'a, E, L> Iter<'a, E, L> {
    fn terminate(&mut self) {
        self.flink = None;
        self.blink = None;
    }
}

impl<'a, E, L> Clone for Iter<'a, E, L> {
    fn clone(&self) -> Self {
        Self {
            flink: self.flink,
            blink: self.blink,
            marker: PhantomData,
        }
    }
}

impl<'a, E, L> Iterator for Iter<'a, E, L>
where
    E: LinkElement<L>,
    L: TypedLink<T = LinkedList>,
{
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        let flink = self.flink?;
        let header = unsafe { &*flink.as_ptr() };

        if self.blink == Some(flink) {
            // We are crossing the other end of the iterator and must not iterate any further.
            self.terminate();
        } else {
            self.flink = header.next.get().as_node();
        }

        Some(header.containing_record())
    }

    fn last(mut self) -> Option<&'a E> {
        self.next_back()
    }
}

impl<'a, E, L> DoubleEndedIterator for Iter<'a, E, L>
where
    E: LinkElement<L>,
    L: TypedLink<T = LinkedList>,
{
    fn next_back(&mut self) -> Option<&'a E> {
        let blink = self.blink?;
        let header = unsafe { &*blink.as_ptr() };

        if self.flink == Some(blink) {
            // We are crossing the other end of the iterator and must not iterate any further.
            self.terminate();
        } else {
            self.blink = header.prev.get().as_node();
        }

        Some(header.containing_record())
    }
}

impl<'a, E, L> FusedIterator for Iter<'a, E, L>
where
    E: LinkElement<L>,
    L: TypedLink<T = LinkedList>,
{
}

/// Mutable iterator over the elements of a doubly linked list.
///
/// This iterator is returned from the [`LlList::iter_mut`] function.
/// Elements are handed out pinned, because moving one would break its links.
pub struct IterMut<'a, E, L> {
    flink: Option<NonNull<LlHeader<E, L>>>,
    blink: Option<NonNull<LlHeader<E, L>>>,
    marker: PhantomData<&'a mut LlList<E, L>>,
}

impl<'a, E, L> IterMut<'a, E, L> {
    fn terminate(&mut self) {
        self.flink = None;
        self.blink = None;
    }
}

impl<'a, E, L> Iterator for IterMut<'a, E, L>
where
    E: LinkElement<L>,
    L: TypedLink<T = LinkedList>,
{
    type Item = Pin<&'a mut E>;

    fn next(&mut self) -> Option<Pin<&'a mut E>> {
        let flink = self.flink?;
        let header = unsafe { &*flink.as_ptr() };

        if self.blink == Some(flink) {
            // We are crossing the other end of the iterator and must not iterate any further.
            self.terminate();
        } else {
            self.flink = header.next.get().as_node();
        }

        Some(unsafe { Pin::new_unchecked(&mut *header.element_ptr()) })
    }

    fn last(mut self) -> Option<Pin<&'a mut E>> {
        self.next_back()
    }
}

impl<'a, E, L> DoubleEndedIterator for IterMut<'a, E, L>
where
    E: LinkElement<L>,
    L: TypedLink<T = LinkedList>,
{
    fn next_back(&mut self) -> Option<Pin<&'a mut E>> {
        let blink = self.blink?;
        let header = unsafe { &*blink.as_ptr() };

        if self.flink == Some(blink) {
            // We are crossing the other end of the iterator and must not iterate any further.
            self.terminate();
        } else {
            self.blink = header.prev.get().as_node();
        }

        Some(unsafe { Pin::new_unchecked(&mut *header.element_ptr()) })
    }
}

impl<'a, E, L> FusedIterator for IterMut<'a, E, L>
where
    E: LinkElement<L>,
    L: TypedLink<T = LinkedList>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::LinkedList;
    use crate::LinkElement;
    use alloc::vec::Vec;
    use moveit::moveit;

    #[derive(LinkedList)]
    enum MyList {}

    #[derive(LinkElement)]
    struct MyElement {
        value: i32,
        id: usize,
        entry: LlHeader<Self, MyList>,
    }

    impl MyElement {
        fn new(value: i32, id: usize) -> Self {
            Self {
                value,
                id,
                entry: LlHeader::new(),
            }
        }
    }

    impl PartialEq for MyElement {
        fn eq(&self, other: &Self) -> bool {
            self.value == other.value
        }
    }

    impl PartialOrd for MyElement {
        fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
            self.value.partial_cmp(&other.value)
        }
    }

    fn elements(values: &[i32]) -> Vec<MyElement> {
        values
            .iter()
            .enumerate()
            .map(|(id, value)| MyElement::new(*value, id))
            .collect()
    }

    fn values(list: Pin<&LlList<MyElement, MyList>>) -> Vec<i32> {
        unsafe { list.iter().map(|element| element.value).collect() }
    }

    fn ids(list: Pin<&LlList<MyElement, MyList>>) -> Vec<usize> {
        unsafe { list.iter().map(|element| element.id).collect() }
    }

    #[test]
    fn test_append() {
        let elements1 = elements(&[0, 1, 2]);
        let elements2 = elements(&[3, 4]);

        moveit! {
            let mut list1 = unsafe { LlList::<MyElement, MyList>::from_nodes(elements1.iter()) };
            let mut list2 = unsafe { LlList::<MyElement, MyList>::from_nodes(elements2.iter()) };
            let mut list3 = LlList::<MyElement, MyList>::new();
        }

        list1.as_mut().append(list2.as_mut());

        assert_eq!(values(list1.as_ref()), [0, 1, 2, 3, 4]);
        assert!(list2.as_ref().is_empty());
        verify_all_links(list1.as_ref());
        verify_all_links(list2.as_ref());

        // Append the final list to an empty list.
        list3.as_mut().append(list1.as_mut());

        assert_eq!(list3.as_ref().len(), 5);
        assert_eq!(list1.as_ref().len(), 0);
        verify_all_links(list3.as_ref());
    }

    #[test]
    fn test_back_and_front() {
        let elements = elements(&[0, 1, 2, 3]);

        moveit! {
            let mut list = LlList::<MyElement, MyList>::new();
        }

        unsafe {
            assert!(list.as_ref().front().is_none());
            assert!(list.as_ref().back().is_none());

            for element in &elements {
                list.as_mut().link_back(element);
            }

            assert_eq!(list.as_ref().back().unwrap().value, 3);
            assert_eq!(list.as_ref().front().unwrap().value, 0);
        }
    }

    #[test]
    fn test_link_front_and_back() {
        let elements = elements(&[0, 1, 2, 3]);

        moveit! {
            let mut list = LlList::<MyElement, MyList>::new();
        }

        unsafe {
            list.as_mut().link_back(&elements[1]);
            list.as_mut().link_front(&elements[0]);
            list.as_mut().link_back(&elements[2]);
            list.as_mut().link_back(&elements[3]);
        }

        assert_eq!(values(list.as_ref()), [0, 1, 2, 3]);
        verify_all_links(list.as_ref());

        // Linking a member again moves it.
        unsafe {
            list.as_mut().link_back(&elements[0]);
            list.as_mut().link_front(&elements[2]);
        }

        assert_eq!(values(list.as_ref()), [2, 1, 3, 0]);
        verify_all_links(list.as_ref());
    }

    #[test]
    fn test_link_from_other_list() {
        let elements = elements(&[0, 1, 2]);

        moveit! {
            let mut list1 = unsafe { LlList::<MyElement, MyList>::from_nodes(elements.iter()) };
            let mut list2 = LlList::<MyElement, MyList>::new();
        }

        unsafe {
            list2.as_mut().link_back(&elements[2]);
            list2.as_mut().link_back(&elements[0]);
        }

        assert_eq!(values(list1.as_ref()), [1]);
        assert_eq!(values(list2.as_ref()), [2, 0]);
        verify_all_links(list1.as_ref());
        verify_all_links(list2.as_ref());
    }

    #[test]
    fn test_detach_front_and_back() {
        let elements = elements(&[0, 1, 2]);

        moveit! {
            let mut list = unsafe { LlList::<MyElement, MyList>::from_nodes(elements.iter()) };
        }

        unsafe {
            assert_eq!(list.as_mut().detach_front().unwrap().value, 0);
            assert_eq!(list.as_mut().detach_back().unwrap().value, 2);
            assert_eq!(values(list.as_ref()), [1]);

            assert_eq!(list.as_mut().detach_back().unwrap().value, 1);
            assert!(list.as_mut().detach_front().is_none());
            assert!(list.as_mut().detach_back().is_none());
        }

        assert!(list.as_ref().is_empty());
        assert!(elements.iter().all(|element| element.entry.is_detached()));
    }

    #[test]
    fn test_clear() {
        let elements = elements(&[0, 1, 2]);

        moveit! {
            let mut list = unsafe { LlList::<MyElement, MyList>::from_nodes(elements.iter()) };
        }

        list.as_mut().clear();
        assert!(list.as_ref().is_empty());

        // The elements are still linked to each other.
        verify_bare_chain(&elements);
    }

    #[test]
    fn test_drop_leaves_bare_chain() {
        let elements = elements(&[0, 1, 2]);

        {
            moveit! {
                let list = unsafe { LlList::<MyElement, MyList>::from_nodes(elements.iter()) };
            }

            assert_eq!(list.as_ref().len(), 3);
        }

        verify_bare_chain(&elements);
    }

    #[test]
    fn test_element_drop() {
        let elements = elements(&[0, 2]);

        moveit! {
            let mut list = unsafe { LlList::<MyElement, MyList>::from_nodes(elements.iter()) };
        }

        {
            let middle = MyElement::new(1, 2);
            unsafe {
                raw::link_detached_as_next(&elements[0].entry, &middle.entry);
            }
            assert_eq!(values(list.as_ref()), [0, 1, 2]);
        }

        assert_eq!(values(list.as_ref()), [0, 2]);
        verify_all_links(list.as_ref());

        {
            let only = MyElement::new(5, 3);
            unsafe {
                list.as_mut().clear();
                list.as_mut().link_back(&only);
            }
            assert_eq!(values(list.as_ref()), [5]);
        }

        assert!(list.as_ref().is_empty());
        verify_all_links(list.as_ref());
    }

    #[test]
    fn test_iter() {
        let elements = elements(&[0, 1, 2, 3, 4]);

        moveit! {
            let list = unsafe { LlList::<MyElement, MyList>::from_nodes(elements.iter()) };
        }

        unsafe {
            let mut iter = list.as_ref().iter();
            assert_eq!(iter.next().unwrap().value, 0);
            assert_eq!(iter.next_back().unwrap().value, 4);

            // Independent passes.
            let values: Vec<i32> = iter.clone().map(|element| element.value).collect();
            assert_eq!(values, [1, 2, 3]);
            let values: Vec<i32> = iter.rev().map(|element| element.value).collect();
            assert_eq!(values, [3, 2, 1]);

            let values: Vec<i32> = list
                .as_ref()
                .iter_from(&elements[3])
                .map(|element| element.value)
                .collect();
            assert_eq!(values, [3, 4]);

            assert_eq!(list.as_ref().iter().last().unwrap().value, 4);
        }
    }

    #[test]
    fn test_iter_mut() {
        let elements = elements(&[0, 1, 2]);

        moveit! {
            let mut list = unsafe { LlList::<MyElement, MyList>::from_nodes(elements.iter()) };
        }

        unsafe {
            for element in list.as_mut().iter_mut() {
                element.get_unchecked_mut().value *= 10;
            }
        }

        assert_eq!(values(list.as_ref()), [0, 10, 20]);
        verify_all_links(list.as_ref());
    }

    #[test]
    fn test_merge() {
        let elements1 = elements(&[1, 3, 3]);
        let elements2 = elements(&[2, 3, 4]);

        moveit! {
            let mut list1 = unsafe { LlList::<MyElement, MyList>::from_nodes(elements1.iter()) };
            let mut list2 = unsafe { LlList::<MyElement, MyList>::from_nodes(elements2.iter()) };
        }

        unsafe {
            list1.as_mut().merge(list2.as_mut());
        }

        assert_eq!(values(list1.as_ref()), [1, 2, 3, 3, 3, 4]);
        assert!(list2.as_ref().is_empty());
        verify_all_links(list1.as_ref());
        verify_all_links(list2.as_ref());

        // The 3s of the left-hand list come first.
        let merged: Vec<*const MyElement> = unsafe {
            list1
                .as_ref()
                .iter()
                .map(|element| element as *const MyElement)
                .collect()
        };
        assert_eq!(merged[2], &elements1[1] as *const MyElement);
        assert_eq!(merged[3], &elements1[2] as *const MyElement);
        assert_eq!(merged[4], &elements2[1] as *const MyElement);
    }

    #[test]
    fn test_merge_empty() {
        let elements1 = elements(&[1, 2]);

        moveit! {
            let mut list1 = unsafe { LlList::<MyElement, MyList>::from_nodes(elements1.iter()) };
            let mut list2 = LlList::<MyElement, MyList>::new();
        }

        // Merging an empty list changes nothing.
        unsafe {
            list1.as_mut().merge(list2.as_mut());
        }
        assert_eq!(values(list1.as_ref()), [1, 2]);

        // Merging into an empty list moves all elements.
        unsafe {
            list2.as_mut().merge_by(list1.as_mut(), |a, b| a.value < b.value);
        }
        assert_eq!(values(list2.as_ref()), [1, 2]);
        assert!(list1.as_ref().is_empty());
        verify_all_links(list1.as_ref());
        verify_all_links(list2.as_ref());
    }

    #[test]
    fn test_remove() {
        let elements = elements(&[0, 1, 2, 1, 3, 4, 5]);
        let one = MyElement::new(1, 99);

        moveit! {
            let mut list = unsafe { LlList::<MyElement, MyList>::from_nodes(elements.iter()) };
        }

        unsafe {
            assert_eq!(list.as_mut().remove(&one), 2);
            assert_eq!(values(list.as_ref()), [0, 2, 3, 4, 5]);

            assert_eq!(list.as_mut().remove_if(|element| element.value > 3), 2);
            assert_eq!(values(list.as_ref()), [0, 2, 3]);

            list.as_mut().retain(|element| element.value != 0);
            assert_eq!(values(list.as_ref()), [2, 3]);
        }

        verify_all_links(list.as_ref());

        moveit! {
            let mut empty = LlList::<MyElement, MyList>::new();
        }

        unsafe {
            assert_eq!(empty.as_mut().remove_if(|_| true), 0);
        }
    }

    #[test]
    fn test_reverse() {
        let elements = elements(&[0, 1, 2, 3]);

        moveit! {
            let mut list = unsafe { LlList::<MyElement, MyList>::from_nodes(elements.iter()) };
        }

        list.as_mut().reverse();
        assert_eq!(values(list.as_ref()), [3, 2, 1, 0]);
        verify_all_links(list.as_ref());

        list.as_mut().reverse();
        assert_eq!(values(list.as_ref()), [0, 1, 2, 3]);
        verify_all_links(list.as_ref());
    }

    #[test]
    fn test_sort() {
        let elements = elements(&[2, 1, 2, 1]);

        moveit! {
            let mut list = unsafe { LlList::<MyElement, MyList>::from_nodes(elements.iter()) };
        }

        unsafe {
            list.as_mut().sort();
        }

        assert_eq!(values(list.as_ref()), [1, 1, 2, 2]);
        assert_eq!(ids(list.as_ref()), [1, 3, 0, 2]);
        verify_all_links(list.as_ref());

        unsafe {
            list.as_mut().sort_by(|a, b| a.value > b.value);
        }

        assert_eq!(values(list.as_ref()), [2, 2, 1, 1]);
        assert_eq!(ids(list.as_ref()), [0, 2, 1, 3]);
        verify_all_links(list.as_ref());
    }

    #[test]
    fn test_splice() {
        let elements1 = elements(&[0, 3]);
        let elements2 = elements(&[1, 2]);
        let elements3 = elements(&[4]);

        moveit! {
            let mut list1 = unsafe { LlList::<MyElement, MyList>::from_nodes(elements1.iter()) };
            let mut list2 = unsafe { LlList::<MyElement, MyList>::from_nodes(elements2.iter()) };
            let mut list3 = unsafe { LlList::<MyElement, MyList>::from_nodes(elements3.iter()) };
        }

        unsafe {
            list1
                .as_mut()
                .splice(Some(&elements1[1]), list2.as_mut());
            list1.as_mut().splice(None, list3.as_mut());
        }

        assert_eq!(values(list1.as_ref()), [0, 1, 2, 3, 4]);
        assert!(list2.as_ref().is_empty());
        assert!(list3.as_ref().is_empty());
        verify_all_links(list1.as_ref());
    }

    #[test]
    fn test_unique() {
        let elements = elements(&[1, 1, 2, 1]);

        moveit! {
            let mut list = unsafe { LlList::<MyElement, MyList>::from_nodes(elements.iter()) };
        }

        unsafe {
            assert_eq!(list.as_mut().unique(), 1);
        }

        assert_eq!(values(list.as_ref()), [1, 2, 1]);
        assert_eq!(ids(list.as_ref()), [0, 2, 3]);
        verify_all_links(list.as_ref());
    }

    #[test]
    fn test_move_and_take_from() {
        let others = elements(&[7]);
        let elements = elements(&[0, 1, 2]);

        moveit! {
            let list = unsafe { LlList::<MyElement, MyList>::from_nodes(elements.iter()) };
        }
        moveit! {
            let mut moved = new::mov(list);
        }

        assert_eq!(values(moved.as_ref()), [0, 1, 2]);
        verify_all_links(moved.as_ref());

        moveit! {
            let mut list = unsafe { LlList::<MyElement, MyList>::from_nodes(others.iter()) };
        }

        list.as_mut().take_from(moved.as_mut());

        assert_eq!(values(list.as_ref()), [0, 1, 2]);
        assert!(moved.as_ref().is_empty());
        verify_all_links(list.as_ref());

        // The former element of `list` was left behind.
        assert!(others[0].entry.is_detached());
    }

    fn verify_bare_chain(elements: &[MyElement]) {
        assert!(elements[0].entry.prev.get().is_empty());
        assert!(elements[elements.len() - 1].entry.next.get().is_empty());

        for pair in elements.windows(2) {
            assert_eq!(pair[0].entry.next.get(), pair[1].entry.as_link());
            assert_eq!(pair[1].entry.prev.get(), pair[0].entry.as_link());
        }
    }

    fn verify_all_links<E, L>(list: Pin<&LlList<E, L>>)
    where
        E: LinkElement<L>,
        L: TypedLink<T = LinkedList>,
    {
        let end = list.get_ref().as_link();

        if list.is_empty() {
            assert!(list.last.get().is_none());
            return;
        }

        // Traverse the list in forward direction and collect all entries.
        let mut current = list.first_link();
        let mut forward_entries = Vec::<NonNull<LlHeader<E, L>>>::new();

        while let Some(header) = current.as_node() {
            let header = unsafe { header.as_ref() };

            if let Some(prev) = forward_entries.last() {
                // Verify that the previous entry is referenced by this entry's `prev`.
                assert_eq!(Link::Node(*prev), header.prev.get());
            } else {
                assert_eq!(end, header.prev.get());
            }

            forward_entries.push(NonNull::from(header));
            current = header.next.get();
        }

        assert_eq!(current, end);

        // Traverse the list in backward direction and collect all entries.
        let mut current = list.last_link();
        let mut backward_entries =
            Vec::<NonNull<LlHeader<E, L>>>::with_capacity(forward_entries.len());

        while let Some(header) = current.as_node() {
            let header = unsafe { header.as_ref() };

            if let Some(next) = backward_entries.last() {
                // Verify that the previous entry is referenced by this entry's `next`.
                assert_eq!(Link::Node(*next), header.next.get());
            }

            backward_entries.push(NonNull::from(header));
            current = header.prev.get();
        }

        assert_eq!(current, end);

        // Verify that `backward_entries` is the exact reverse of `forward_entries`.
        assert_eq!(forward_entries.len(), backward_entries.len());

        for (fe, be) in forward_entries.iter().zip(backward_entries.iter().rev()) {
            assert_eq!(fe, be);
        }
    }
}
